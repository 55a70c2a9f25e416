//! Forest assembly at the boundary to the data sources
//!
//! Every exportable entity delivers its own data tree; the trees become the
//! row-trees of one export forest.

use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DataNode;

/// Failure of one entity to produce its data tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct DataError {
    pub message: String,
}

impl DataError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Anything that can contribute a row-tree to an export.
pub trait Exportable {
    /// Row label, e.g. the sample name.
    fn label(&self) -> String;

    /// Data tree rooted at this entity.
    fn get_data(&self) -> Result<DataNode, DataError>;
}

impl Exportable for DataNode {
    fn label(&self) -> String {
        self.descriptive_name.clone()
    }

    fn get_data(&self) -> Result<DataNode, DataError> {
        Ok(self.clone())
    }
}

/// One entity left out of the export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityFailure {
    pub label: String,
    pub message: String,
}

/// Forest root plus the entities that could not be exported.
#[derive(Debug, Clone)]
pub struct AssembledForest {
    pub root: DataNode,
    pub failures: Vec<EntityFailure>,
}

impl AssembledForest {
    /// Row labels, parallel to the row-trees of `root`.
    pub fn labels(&self) -> Vec<String> {
        self.root
            .children
            .iter()
            .map(|row| row.descriptive_name.clone())
            .collect()
    }
}

/// Collects the data trees of many entities into one forest.
#[derive(Debug, Default)]
pub struct ForestAssembler;

impl ForestAssembler {
    pub fn new() -> Self {
        Self
    }

    /// Assemble a forest named `root_name` from `entities`.
    ///
    /// `can_view` is the external permission oracle; a single denial aborts
    /// the whole export. Entities whose data cannot be produced are skipped
    /// and reported in [`AssembledForest::failures`].
    #[instrument(level = "debug", skip(self, entities, can_view))]
    pub fn assemble<E, F>(
        &self,
        root_name: &str,
        entities: &[E],
        can_view: F,
    ) -> ApplicationResult<AssembledForest>
    where
        E: Exportable,
        F: Fn(&E) -> bool,
    {
        if let Some(denied) = entities.iter().find(|&e| !can_view(e)) {
            return Err(ApplicationError::PermissionDenied(denied.label()));
        }

        let mut root = DataNode::new(root_name);
        let mut failures = Vec::new();
        for entity in entities {
            match entity.get_data() {
                Ok(tree) => {
                    let label = entity.label();
                    root.push_child(tree.with_descriptive_name(label));
                }
                Err(e) => {
                    warn!(entity = %entity.label(), error = %e, "skipping entity");
                    failures.push(EntityFailure {
                        label: entity.label(),
                        message: e.message,
                    });
                }
            }
        }

        debug!(
            rows = root.children.len(),
            failures = failures.len(),
            "forest assembled"
        );
        Ok(AssembledForest { root, failures })
    }
}
