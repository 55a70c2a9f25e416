//! Flattening of row-trees into name → (key → value) lookups

use std::collections::HashMap;

use generational_arena::Index;

use crate::domain::arena::DataForest;
use crate::domain::entities::{CellValue, GroupId};

/// One flattened row-tree: every node of the tree, keyed by its disambiguated
/// name, mapped to its items.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRow {
    groups: HashMap<GroupId, HashMap<String, CellValue>>,
}

impl FlatRow {
    pub fn group(&self, id: &GroupId) -> Option<&HashMap<String, CellValue>> {
        self.groups.get(id)
    }

    /// Value of `key` in group `id`, if both exist.
    pub fn value(&self, id: &GroupId, key: &str) -> Option<&CellValue> {
        self.groups.get(id).and_then(|items| items.get(key))
    }
}

/// Flatten the row-tree rooted at `row_root`.
pub fn flatten_row_tree(forest: &DataForest, row_root: Index) -> FlatRow {
    let groups = forest
        .iter_from(row_root)
        .map(|(_, node)| {
            let items = node
                .items
                .iter()
                .map(|item| (item.key.clone(), item.value.clone()))
                .collect();
            (node.id.clone(), items)
        })
        .collect();
    FlatRow { groups }
}

/// Flatten every row-tree of the forest, in row order.
pub fn flatten_forest(forest: &DataForest) -> Vec<FlatRow> {
    forest
        .row_roots()
        .iter()
        .map(|&row_root| flatten_row_tree(forest, row_root))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DataItem, DataNode};

    #[test]
    fn given_nested_row_when_flattened_then_all_nodes_are_reachable() {
        let root = DataNode::new("root").with_child(
            DataNode::new("Deposition")
                .with_item(DataItem::new("number", "1"))
                .with_child(DataNode::new("Layer 1").with_item(DataItem::new("gas", "SiH4"))),
        );
        let forest = DataForest::from_root(root, 1);

        let rows = flatten_forest(&forest);

        assert_eq!(rows.len(), 1);
        assert_eq!(
            rows[0].value(&GroupId::from("Deposition"), "number"),
            Some(&CellValue::from("1"))
        );
        assert_eq!(
            rows[0].value(&GroupId::from("Deposition, Layer 1"), "gas"),
            Some(&CellValue::from("SiH4"))
        );
    }

    #[test]
    fn given_absent_value_when_flattened_then_cell_is_empty() {
        let root = DataNode::new("root").with_child(
            DataNode::new("Deposition").with_item(DataItem::new("comment", None::<String>)),
        );
        let forest = DataForest::from_root(root, 1);

        let rows = flatten_forest(&forest);

        assert_eq!(
            rows[0].value(&GroupId::from("Deposition"), "comment"),
            Some(&CellValue::Empty)
        );
    }
}
