//! Integration tests for forest construction and node name disambiguation.

use labtable::domain::{DataForest, DataNode};
use rstest::rstest;

fn ids(forest: &DataForest) -> Vec<String> {
    forest.iter().skip(1).map(|(_, node)| node.id.to_string()).collect()
}

fn sample_with_layers() -> DataNode {
    DataNode::new("series").with_child(
        DataNode::new("S")
            .with_child(DataNode::new("layer"))
            .with_child(DataNode::new("layer"))
            .with_child(DataNode::new("other")),
    )
}

#[rstest]
#[case::prefix_below_rows(1, vec!["S", "S, layer #1", "S, layer #2", "S, other"])]
#[case::keep_process_names(2, vec!["S", "layer #1", "layer #2", "other"])]
fn given_equal_siblings_when_built_then_numbered_and_prefixed_by_offset(
    #[case] renaming_offset: usize,
    #[case] expected: Vec<&str>,
) {
    // Arrange
    let root = sample_with_layers();

    // Act
    let forest = DataForest::from_root(root, renaming_offset);

    // Assert
    assert_eq!(ids(&forest), expected);
}

#[test]
fn given_rows_with_equal_names_when_built_then_row_roots_are_not_numbered() {
    let root = DataNode::new("notebook")
        .with_child(DataNode::new("Deposition").with_descriptive_name("08B-410"))
        .with_child(DataNode::new("Deposition").with_descriptive_name("08B-411"));

    let forest = DataForest::from_root(root, 1);

    assert_eq!(ids(&forest), vec!["Deposition", "Deposition"]);
    assert_eq!(forest.descriptive_names(), vec!["08B-410", "08B-411"]);
}

#[test]
fn given_deep_tree_when_built_then_prefix_is_parents_final_name() {
    // Arrange
    let root = DataNode::new("series").with_child(
        DataNode::new("S")
            .with_child(DataNode::new("L").with_child(DataNode::new("M")))
            .with_child(DataNode::new("L").with_child(DataNode::new("M"))),
    );

    // Act
    let forest = DataForest::from_root(root, 1);

    // Assert
    assert_eq!(
        ids(&forest),
        vec!["S", "S, L #1", "S, L #1, M", "S, L #2", "S, L #2, M"]
    );
}

#[test]
fn given_node_without_descriptive_name_when_built_then_label_is_node_name() {
    let root = DataNode::new("notebook").with_child(DataNode::new("PDS measurement"));

    let forest = DataForest::from_root(root, 1);

    assert_eq!(forest.descriptive_names(), vec!["PDS measurement"]);
    let row = forest.get_node(forest.row_roots()[0]).unwrap();
    assert!(row.top_level);
    assert_eq!(row.kind, "PDS measurement");
}

#[test]
fn given_forest_when_iterated_then_visits_every_node_once() {
    let root = sample_with_layers();
    let node_count = root.node_count();

    let forest = DataForest::from_root(root, 1);

    assert_eq!(forest.len(), node_count);
    assert_eq!(forest.iter().count(), node_count);
    assert_eq!(forest.root_node().unwrap().id.as_str(), "series");
}
