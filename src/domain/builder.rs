//! Column-group builder: unifies the row-trees of a forest into one ordered
//! list of column groups and one parallel list of columns.

use std::collections::{HashMap, HashSet};

use tracing::{debug, instrument, trace};

use crate::domain::arena::{DataForest, ForestNode};
use crate::domain::columns::{Column, ColumnGroup, ColumnLayout};
use crate::domain::entities::GroupId;
use crate::domain::error::{DomainError, DomainResult};

/// Constructs the column layout of a forest.
///
/// Column groups keep the order in which the first row-tree introduced them.
/// Groups first seen in a later row-tree are inserted right after the
/// group that preceded them in that row-tree.
pub struct ColumnGroupBuilder {
    column_groups: Vec<ColumnGroup>,
    columns: Vec<Column>,
    shared_columns: HashMap<(String, String), usize>,
    nesting: HashMap<GroupId, bool>,
    position: usize,
}

impl Default for ColumnGroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnGroupBuilder {
    pub fn new() -> Self {
        Self {
            column_groups: Vec::new(),
            columns: Vec::new(),
            shared_columns: HashMap::new(),
            nesting: HashMap::new(),
            position: 0,
        }
    }

    /// Build the column layout of all row-trees in `forest`.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn build(&mut self, forest: &DataForest) -> DomainResult<ColumnLayout> {
        // Reset state for a fresh build
        self.column_groups.clear();
        self.columns.clear();
        self.shared_columns.clear();
        self.nesting.clear();
        self.position = 0;

        for (row, &row_root) in forest.row_roots().iter().enumerate() {
            let mut seen_in_row: HashSet<&GroupId> = HashSet::new();
            for (_, node) in forest.iter_from(row_root) {
                if !seen_in_row.insert(&node.id) {
                    return Err(DomainError::DuplicateNode {
                        row,
                        name: node.id.to_string(),
                    });
                }
                self.check_nesting(row, node)?;
                self.visit(row, node);
            }
        }

        let mut layout = ColumnLayout {
            column_groups: std::mem::take(&mut self.column_groups),
            columns: std::mem::take(&mut self.columns),
        };
        layout.disambig_key_names();
        self.verify(&layout)?;

        debug!(
            groups = layout.column_groups.len(),
            columns = layout.columns.len(),
            shared = self.shared_columns.len(),
            "column layout built"
        );
        Ok(layout)
    }

    fn check_nesting(&mut self, row: usize, node: &ForestNode) -> DomainResult<()> {
        match self.nesting.get(&node.id) {
            Some(&top_level) if top_level != node.top_level => {
                Err(DomainError::InconsistentNesting {
                    row,
                    name: node.id.to_string(),
                })
            }
            Some(_) => Ok(()),
            None => {
                self.nesting.insert(node.id.clone(), node.top_level);
                Ok(())
            }
        }
    }

    fn visit(&mut self, row: usize, node: &ForestNode) {
        if row > 0 {
            if let Some(existing) = self.column_groups.iter().position(|g| g.id == node.id) {
                trace!(group = %node.id, position = existing, "known column group");
                self.position = existing + 1;
                return;
            }
        }

        let mut column_group = ColumnGroup::new(node.id.clone());
        for item in &node.items {
            if node.top_level {
                if let Some(origin) = &item.origin {
                    let shared_key = (origin.clone(), item.key.clone());
                    if let Some(&shared) = self.shared_columns.get(&shared_key) {
                        column_group.insert_key(&item.key, shared);
                        self.columns[shared].append_name(node.id.clone());
                        continue;
                    }
                    self.shared_columns.insert(shared_key, self.columns.len());
                }
            }
            column_group.insert_key(&item.key, self.columns.len());
            self.columns.push(Column::new(node.id.clone(), item.key.clone()));
        }

        trace!(group = %node.id, position = self.position, "new column group");
        self.column_groups.insert(self.position, column_group);
        self.position += 1;
    }

    /// Cross-check groups, columns, and shared columns before handing out
    /// the layout.
    fn verify(&self, layout: &ColumnLayout) -> DomainResult<()> {
        let mut ids = HashSet::new();
        for group in &layout.column_groups {
            if !ids.insert(&group.id) {
                return Err(DomainError::Internal(format!(
                    "column group {} registered twice",
                    group.id
                )));
            }
            for (key, index) in group.key_indices() {
                let column = layout.columns.get(*index).ok_or_else(|| {
                    DomainError::Internal(format!(
                        "group {} points to missing column {index}",
                        group.id
                    ))
                })?;
                if &column.key != key || !column.column_group_names.contains(&group.id) {
                    return Err(DomainError::Internal(format!(
                        "column {index} does not belong to group {} key {key}",
                        group.id
                    )));
                }
            }
        }
        for (&(ref origin, ref key), &index) in &self.shared_columns {
            let column = layout.columns.get(index).ok_or_else(|| {
                DomainError::Internal(format!("shared column {origin}/{key} out of range"))
            })?;
            if &column.key != key {
                return Err(DomainError::Internal(format!(
                    "shared column {origin}/{key} points to key {}",
                    column.key
                )));
            }
        }
        Ok(())
    }
}

/// Convenience wrapper for a one-off build.
pub fn build_column_layout(forest: &DataForest) -> DomainResult<ColumnLayout> {
    ColumnGroupBuilder::new().build(forest)
}
