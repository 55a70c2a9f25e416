//! labtable: flat table export of hierarchical lab data
//!
//! A data forest (one row-tree per sample or process) is disambiguated,
//! merged into column groups, flattened, and rendered as a table for
//! preview or CSV export.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
