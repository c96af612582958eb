use interval_tree::{IntervalLike, IntervalTree};

/// A named span of byte offsets, endpoints inclusive.
#[derive(Debug)]
struct Span {
    name: &'static str,
    start: u64,
    end: u64,
}

impl IntervalLike for Span {
    type Endpoint = u64;

    fn low(&self) -> &u64 {
        &self.start
    }

    fn high(&self) -> &u64 {
        &self.end
    }
}

fn main() {
    let mut tree = IntervalTree::new();
    tree.insert(Span {
        name: "header",
        start: 0,
        end: 63,
    });
    tree.insert(Span {
        name: "body",
        start: 64,
        end: 4095,
    });
    let trailer = tree.insert(Span {
        name: "trailer",
        start: 4096,
        end: 4159,
    });

    for span in tree.find(32, 100) {
        println!("{} [{}, {}]", span.name, span.start, span.end);
    }

    let erased = tree.erase(trailer);
    assert_eq!(erased.name, "trailer");
    assert!(!tree.overlaps(&4096, &4159));

    let mut out = Vec::new();
    tree.dump(&mut out).unwrap();
    print!("{}", String::from_utf8(out).unwrap());
}
