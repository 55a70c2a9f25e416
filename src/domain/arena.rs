//! Arena-backed export forest.
//!
//! The forest root is the object whose data is exported (a sample series, a
//! lab notebook month); its direct children are the row roots, each of which
//! becomes one table row.

use std::collections::HashMap;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::entities::{DataItem, DataNode, GroupId};
use crate::domain::error::{DomainError, DomainResult};

/// Node payload in the forest arena.
#[derive(Debug, Clone)]
pub struct ForestNode {
    /// Disambiguated name, unique within the node's row-tree
    pub id: GroupId,
    /// Node type as delivered by the data source
    pub kind: String,
    /// Row label if this node is a row root
    pub descriptive_name: String,
    pub items: Vec<DataItem>,
    /// True only for direct children of the forest root
    pub top_level: bool,
    /// Index of parent node in the arena, None for the forest root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in source order
    pub children: Vec<Index>,
}

/// Arena-based forest of row-trees.
///
/// Uses generational arena for memory-safe node references and O(1) lookups.
#[derive(Debug)]
pub struct DataForest {
    arena: Arena<ForestNode>,
    root: Option<Index>,
}

impl Default for DataForest {
    fn default() -> Self {
        Self::new()
    }
}

impl DataForest {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Copy a data tree into the arena and make its node names unambiguous.
    ///
    /// `renaming_offset` is the number of levels below the root whose names
    /// are not prefixed with their parent's name. Sibling numbering (`" #2"`)
    /// applies to every level below the row roots.
    #[instrument(level = "debug", skip(root), fields(root = %root.name))]
    pub fn from_root(root: DataNode, renaming_offset: usize) -> Self {
        let mut forest = Self::new();
        let mut stack = vec![(root, None::<Index>, 0usize)];

        while let Some((node, parent_idx, depth)) = stack.pop() {
            let DataNode {
                name,
                descriptive_name,
                items,
                children,
            } = node;
            let data = ForestNode {
                id: GroupId::new(name.clone()),
                kind: name,
                descriptive_name,
                items,
                top_level: depth == 1,
                parent: parent_idx,
                children: Vec::new(),
            };
            let current_idx = forest.insert_node(data, parent_idx);

            // Reverse so that children are inserted, and thus linked, in source order
            for child in children.into_iter().rev() {
                stack.push((child, Some(current_idx), depth + 1));
            }
        }

        forest.disambiguate(renaming_offset);
        debug!(
            rows = forest.row_roots().len(),
            nodes = forest.arena.len(),
            "forest built"
        );
        forest
    }

    #[instrument(level = "trace", skip(self, data))]
    pub fn insert_node(&mut self, data: ForestNode, parent: Option<Index>) -> Index {
        let node_idx = self.arena.insert(ForestNode { parent, ..data });

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    pub fn get_node(&self, idx: Index) -> Option<&ForestNode> {
        self.arena.get(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn root_node(&self) -> DomainResult<&ForestNode> {
        self.root
            .and_then(|idx| self.get_node(idx))
            .ok_or(DomainError::EmptyForest)
    }

    /// Row roots in forest order; empty for an empty forest.
    pub fn row_roots(&self) -> &[Index] {
        self.root
            .and_then(|idx| self.get_node(idx))
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Row labels, parallel to [`row_roots`](Self::row_roots).
    pub fn descriptive_names(&self) -> Vec<String> {
        self.row_roots()
            .iter()
            .filter_map(|&idx| self.get_node(idx))
            .map(|node| node.descriptive_name.clone())
            .collect()
    }

    /// Pre-order walk of the subtree rooted at `idx`.
    pub fn iter_from(&self, idx: Index) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, Some(idx))
    }

    /// Pre-order walk of the whole forest, starting at the root.
    pub fn iter(&self) -> PreOrderIterator<'_> {
        PreOrderIterator::new(self, self.root)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    fn disambiguate(&mut self, renaming_offset: usize) {
        let Some(root) = self.root else {
            return;
        };
        // Parents are processed before their children, so a prefix is always
        // the parent's final name.
        let mut queue = vec![(root, 0usize)];
        while let Some((parent_idx, parent_depth)) = queue.pop() {
            let Some(parent) = self.arena.get(parent_idx) else {
                continue;
            };
            let parent_name = parent.id.as_str().to_string();
            let children = parent.children.clone();
            let child_depth = parent_depth + 1;

            let mut totals: HashMap<String, usize> = HashMap::new();
            for &child_idx in &children {
                if let Some(child) = self.arena.get(child_idx) {
                    *totals.entry(child.kind.clone()).or_default() += 1;
                }
            }

            let mut seen: HashMap<String, usize> = HashMap::new();
            for &child_idx in &children {
                let Some(child) = self.arena.get_mut(child_idx) else {
                    continue;
                };
                let mut name = child.kind.clone();
                if child_depth > 1 && totals.get(&child.kind).copied().unwrap_or(0) > 1 {
                    let occurrence = seen.entry(child.kind.clone()).or_default();
                    *occurrence += 1;
                    name = format!("{name} #{occurrence}");
                }
                if child_depth > renaming_offset {
                    name = format!("{parent_name}, {name}");
                }
                child.id = GroupId::new(name);
                queue.push((child_idx, child_depth));
            }
        }
    }
}

pub struct PreOrderIterator<'a> {
    forest: &'a DataForest,
    stack: Vec<Index>,
}

impl<'a> PreOrderIterator<'a> {
    fn new(forest: &'a DataForest, start: Option<Index>) -> Self {
        Self {
            forest,
            stack: start.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for PreOrderIterator<'a> {
    type Item = (Index, &'a ForestNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.forest.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}
