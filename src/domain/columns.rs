//! Column groups and columns of the exported table

use std::collections::HashMap;

use crate::domain::entities::{CellValue, GroupId};
use crate::domain::flatten::FlatRow;

/// Set of columns stemming from one distinct node name.
///
/// Two column groups are equal iff their ids are equal.
#[derive(Debug, Clone)]
pub struct ColumnGroup {
    pub id: GroupId,
    /// Item key → index into the layout's `columns`, in first-seen order
    key_indices: Vec<(String, usize)>,
}

impl PartialEq for ColumnGroup {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ColumnGroup {}

impl ColumnGroup {
    pub fn new(id: GroupId) -> Self {
        Self {
            id,
            key_indices: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.id.as_str()
    }

    /// Register `key` at `index`; a repeated key points to its latest column.
    pub fn insert_key(&mut self, key: &str, index: usize) {
        match self.key_indices.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = index,
            None => self.key_indices.push((key.to_string(), index)),
        }
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.key_indices
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, i)| *i)
    }

    pub fn key_indices(&self) -> &[(String, usize)] {
        &self.key_indices
    }

    /// Column indices of this group in ascending order.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self.key_indices.iter().map(|(_, i)| *i).collect();
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

/// One addressable output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Groups that may supply the value; more than one only for shared columns
    pub column_group_names: Vec<GroupId>,
    /// Pristine item key
    pub key: String,
    /// Display heading, unique across the whole table after disambiguation
    pub heading: String,
}

impl Column {
    pub fn new(group: GroupId, key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            column_group_names: vec![group],
            heading: key.clone(),
            key,
        }
    }

    /// Register another group carrying this shared column.
    pub fn append_name(&mut self, group: GroupId) {
        self.column_group_names.push(group);
    }

    /// Suffix the heading with all owning group names.
    pub fn disambig(&mut self) {
        let names: Vec<&str> = self
            .column_group_names
            .iter()
            .map(GroupId::as_str)
            .collect();
        self.heading = format!("{} {{{}}}", self.key, names.join(" / "));
    }

    /// Cell value of this column in `row`.
    ///
    /// The first owning group present in the row wins. A row without any of
    /// the groups yields an empty cell.
    pub fn get_value(&self, row: &FlatRow) -> CellValue {
        self.column_group_names
            .iter()
            .find_map(|group| row.group(group))
            .and_then(|items| items.get(&self.key).cloned())
            .unwrap_or_default()
    }
}

/// Result of the column-group build pass.
#[derive(Debug, Clone, Default)]
pub struct ColumnLayout {
    pub column_groups: Vec<ColumnGroup>,
    pub columns: Vec<Column>,
}

impl ColumnLayout {
    pub fn column_group_by_name(&self, name: &str) -> Option<&ColumnGroup> {
        self.column_groups.iter().find(|g| g.name() == name)
    }

    /// Every column index, in layout order.
    pub fn all_indices(&self) -> Vec<usize> {
        (0..self.columns.len()).collect()
    }

    pub fn headings(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.heading.as_str()).collect()
    }

    /// Make headings unique: every column whose key occurs more than once
    /// gets the owning group names appended.
    pub(crate) fn disambig_key_names(&mut self) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for column in &self.columns {
            *counts.entry(column.key.as_str()).or_default() += 1;
        }
        let duplicates: Vec<String> = counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(k, _)| k.to_string())
            .collect();
        for column in &mut self.columns {
            if duplicates.contains(&column.key) {
                column.disambig();
            }
        }
    }
}
