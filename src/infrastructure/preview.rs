//! Terminal renderings: aligned preview tables and forest trees

use generational_arena::Index;
use itertools::Itertools;
use termtree::Tree;

use crate::domain::{ColumnLayout, DataForest, Table};

/// Render `table` as left-aligned text columns separated by two spaces.
pub fn render_table(table: &Table) -> String {
    let rows = table.to_string_rows();
    let widths: Vec<usize> = (0..table.width())
        .map(|col| {
            rows.iter()
                .map(|row| row.get(col).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:<width$}"))
                .join("  ")
                .trim_end()
                .to_string()
        })
        .join("\n")
}

/// Render column groups with their column indices and headings.
pub fn render_layout(layout: &ColumnLayout) -> Tree<String> {
    let leaves = layout.column_groups.iter().map(|group| {
        let columns = group.sorted_indices().into_iter().map(|i| {
            let column = &layout.columns[i];
            let shared = if column.column_group_names.len() > 1 {
                " (shared)"
            } else {
                ""
            };
            Tree::new(format!("[{i}] {}{shared}", column.heading))
        });
        Tree::new(group.name().to_string()).with_leaves(columns)
    });
    Tree::new("column groups".to_string()).with_leaves(leaves)
}

/// Conversion of a disambiguated forest into a printable tree.
pub trait ForestDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl ForestDisplay for DataForest {
    fn to_tree_string(&self) -> Tree<String> {
        fn build_tree(forest: &DataForest, node_idx: Index) -> Tree<String> {
            let Some(node) = forest.get_node(node_idx) else {
                return Tree::new(String::new());
            };
            let label = if node.top_level && !node.descriptive_name.is_empty() {
                format!("{} ({})", node.id, node.descriptive_name)
            } else {
                node.id.to_string()
            };
            let leaves = node
                .children
                .iter()
                .map(|&child| build_tree(forest, child));
            Tree::new(label).with_leaves(leaves)
        }

        match self.root() {
            Some(root) => build_tree(self, root),
            None => Tree::new("(empty)".to_string()),
        }
    }
}
