//! Integration tests for the column-group builder.

use labtable::domain::{
    build_column_layout, flatten_forest, generate_table, CellValue, ColumnGroupBuilder,
    ColumnLayout, DataForest, DataItem, DataNode, DomainError,
};
use labtable::util::testing;
use rstest::rstest;

fn group_names(layout: &ColumnLayout) -> Vec<&str> {
    layout.column_groups.iter().map(|g| g.name()).collect()
}

fn deposition_forest() -> DataNode {
    DataNode::new("series")
        .with_child(
            DataNode::new("Deposition")
                .with_item(DataItem::new("number", "1"))
                .with_child(DataNode::new("Layer 1").with_item(DataItem::new("gas", "SiH4"))),
        )
        .with_child(DataNode::new("Deposition").with_item(DataItem::new("number", "2")))
}

#[test]
fn given_two_depositions_when_exported_then_missing_layer_renders_empty() {
    testing::init_test_setup();
    // Arrange
    let forest = DataForest::from_root(deposition_forest(), 2);

    // Act
    let layout = build_column_layout(&forest).expect("layout");
    let rows = flatten_forest(&forest);
    let table = generate_table(&rows, &layout.columns, &layout.all_indices(), &[], "process")
        .expect("table");

    // Assert
    assert_eq!(group_names(&layout), vec!["Deposition", "Layer 1"]);
    assert_eq!(table.header, vec!["number", "gas"]);
    assert_eq!(
        table.rows,
        vec![
            vec![CellValue::from("1"), CellValue::from("SiH4")],
            vec![CellValue::from("2"), CellValue::Empty],
        ]
    );
    assert_eq!(table.rows[1][1].to_string(), "");
}

#[test]
fn given_renaming_offset_one_when_built_then_nested_group_is_prefixed() {
    let forest = DataForest::from_root(deposition_forest(), 1);

    let layout = build_column_layout(&forest).unwrap();

    assert_eq!(group_names(&layout), vec!["Deposition", "Deposition, Layer 1"]);
}

#[test]
fn given_top_level_items_with_same_origin_when_built_then_one_shared_column() {
    // Arrange
    let root = DataNode::new("notebook")
        .with_child(
            DataNode::new("PECVD").with_item(DataItem::with_origin("flow", 10, "gasA")),
        )
        .with_child(
            DataNode::new("Sputter").with_item(DataItem::with_origin("flow", 20, "gasA")),
        );
    let forest = DataForest::from_root(root, 1);

    // Act
    let layout = build_column_layout(&forest).unwrap();

    // Assert
    assert_eq!(layout.columns.len(), 1);
    let names: Vec<&str> = layout.columns[0]
        .column_group_names
        .iter()
        .map(|id| id.as_str())
        .collect();
    assert_eq!(names, vec!["PECVD", "Sputter"]);
    assert_eq!(layout.columns[0].heading, "flow");
    assert_eq!(layout.column_group_by_name("Sputter").unwrap().index_of("flow"), Some(0));

    let rows = flatten_forest(&forest);
    assert_eq!(layout.columns[0].get_value(&rows[0]), CellValue::Integer(10));
    assert_eq!(layout.columns[0].get_value(&rows[1]), CellValue::Integer(20));
}

#[test]
fn given_nested_items_with_same_origin_when_built_then_columns_stay_separate() {
    // Arrange: processes below the samples are not top-level
    let root = DataNode::new("series")
        .with_child(
            DataNode::new("sample 1").with_child(
                DataNode::new("PECVD").with_item(DataItem::with_origin("flow", 10, "gasA")),
            ),
        )
        .with_child(
            DataNode::new("sample 2").with_child(
                DataNode::new("Sputter").with_item(DataItem::with_origin("flow", 20, "gasA")),
            ),
        );
    let forest = DataForest::from_root(root, 2);

    // Act
    let layout = build_column_layout(&forest).unwrap();

    // Assert
    assert_eq!(layout.columns.len(), 2);
    assert_eq!(layout.headings(), vec!["flow {PECVD}", "flow {Sputter}"]);
}

#[test]
fn given_key_in_two_groups_when_built_then_only_colliding_headings_are_suffixed() {
    let root = DataNode::new("notebook")
        .with_child(
            DataNode::new("PECVD")
                .with_item(DataItem::new("pressure", 1.5))
                .with_item(DataItem::new("power", 40)),
        )
        .with_child(DataNode::new("Sputter").with_item(DataItem::new("pressure", 0.2)));
    let forest = DataForest::from_root(root, 1);

    let layout = build_column_layout(&forest).unwrap();

    assert_eq!(
        layout.headings(),
        vec!["pressure {PECVD}", "power", "pressure {Sputter}"]
    );
    assert!(layout.columns.iter().all(|c| c.key != "pressure" || c.heading != c.key));
}

#[test]
fn given_new_group_in_later_row_when_built_then_inserted_after_its_predecessor() {
    // Arrange
    let root = DataNode::new("series")
        .with_child(
            DataNode::new("X")
                .with_child(DataNode::new("a"))
                .with_child(DataNode::new("b")),
        )
        .with_child(
            DataNode::new("X")
                .with_child(DataNode::new("a"))
                .with_child(DataNode::new("c"))
                .with_child(DataNode::new("b")),
        );
    let forest = DataForest::from_root(root, 2);

    // Act
    let layout = build_column_layout(&forest).unwrap();

    // Assert
    assert_eq!(group_names(&layout), vec!["X", "a", "c", "b"]);
}

#[test]
fn given_new_row_root_when_built_then_follows_last_group_of_previous_row() {
    let root = DataNode::new("series")
        .with_child(
            DataNode::new("X")
                .with_child(DataNode::new("a"))
                .with_child(DataNode::new("b")),
        )
        .with_child(DataNode::new("Y").with_child(DataNode::new("a")));
    let forest = DataForest::from_root(root, 2);

    let layout = build_column_layout(&forest).unwrap();

    assert_eq!(group_names(&layout), vec!["X", "a", "b", "Y"]);
}

#[test]
fn given_same_forest_when_built_twice_then_layouts_are_identical() {
    // Arrange
    let root = DataNode::new("notebook")
        .with_child(
            DataNode::new("PECVD")
                .with_item(DataItem::new("pressure", 1.5))
                .with_item(DataItem::with_origin("flow", 10, "gasA")),
        )
        .with_child(
            DataNode::new("Sputter")
                .with_item(DataItem::new("pressure", 0.2))
                .with_item(DataItem::with_origin("flow", 20, "gasA")),
        );
    let forest = DataForest::from_root(root, 1);
    let mut builder = ColumnGroupBuilder::new();

    // Act
    let first = builder.build(&forest).unwrap();
    let second = builder.build(&forest).unwrap();

    // Assert
    assert_eq!(first.columns, second.columns);
    assert_eq!(group_names(&first), group_names(&second));
}

#[rstest]
#[case::no_rows(DataNode::new("empty"), 0, 0)]
#[case::group_without_items(
    DataNode::new("notebook").with_child(DataNode::new("PECVD")),
    1,
    0
)]
#[case::empty_row_among_others(
    DataNode::new("notebook")
        .with_child(DataNode::new("PECVD").with_item(DataItem::new("number", "1")))
        .with_child(DataNode::new("PECVD")),
    1,
    1
)]
fn given_sparse_forest_when_built_then_layout_has_expected_size(
    #[case] root: DataNode,
    #[case] groups: usize,
    #[case] columns: usize,
) {
    let forest = DataForest::from_root(root, 1);

    let layout = build_column_layout(&forest).unwrap();

    assert_eq!(layout.column_groups.len(), groups);
    assert_eq!(layout.columns.len(), columns);
}

#[test]
fn given_name_twice_in_one_row_when_built_then_duplicate_node_error() {
    // Arrange: with offset 3 the nested "x" keeps its bare name
    let root = DataNode::new("series").with_child(
        DataNode::new("S")
            .with_child(DataNode::new("A").with_child(DataNode::new("x")))
            .with_child(DataNode::new("x")),
    );
    let forest = DataForest::from_root(root, 3);

    // Act
    let result = build_column_layout(&forest);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::DuplicateNode {
            row: 0,
            name: "x".to_string()
        }
    );
}

#[test]
fn given_group_top_level_and_nested_when_built_then_inconsistent_nesting_error() {
    let root = DataNode::new("series")
        .with_child(DataNode::new("Deposition"))
        .with_child(DataNode::new("S").with_child(DataNode::new("Deposition")));
    let forest = DataForest::from_root(root, 2);

    let result = build_column_layout(&forest);

    assert_eq!(
        result.unwrap_err(),
        DomainError::InconsistentNesting {
            row: 1,
            name: "Deposition".to_string()
        }
    );
}
