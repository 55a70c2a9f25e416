//! Domain layer: the export core
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod columns;
pub mod entities;
pub mod error;
pub mod flatten;
pub mod selection;
pub mod table;

pub use arena::{DataForest, ForestNode};
pub use builder::{build_column_layout, ColumnGroupBuilder};
pub use columns::{Column, ColumnGroup, ColumnLayout};
pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use flatten::{flatten_forest, flatten_row_tree, FlatRow};
pub use selection::{PreviousSelection, SelectionState};
pub use table::{generate_table, Table};
