use interval_tree::{Interval, IntervalTree};

fn main() {
    let mut tree = IntervalTree::new();
    tree.insert(Interval::new(3, 7));
    tree.insert(Interval::new(2, 6));

    let tmp_point = Interval::point(5);
    assert_eq!(tmp_point, Interval::new(5, 5));
    tree.insert(tmp_point);

    // a stabbing query reports every interval containing the point
    let hits: Vec<_> = tree.find(5, 5).collect();
    assert_eq!(hits.len(), 3);
    for interval in hits {
        println!("{interval}");
    }
}
