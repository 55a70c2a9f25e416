//! Infrastructure layer: I/O implementations and DI container
//!
//! This layer implements I/O boundary traits, serializers, and wires up services.

pub mod csv_writer;
pub mod di;
pub mod error;
pub mod forest_file;
pub mod preview;
pub mod traits;

pub use error::{InfraError, InfraResult};
