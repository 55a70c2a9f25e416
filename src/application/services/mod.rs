//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.

mod export;
mod forest;

pub use export::{ExportOutcome, ExportRequest, ExportService, ExportView, PreparedExport};
pub use forest::{AssembledForest, DataError, EntityFailure, Exportable, ForestAssembler};
