//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;

use crate::application::services::{ExportService, PreparedExport};
use crate::config::Settings;
use crate::domain::Table;
use crate::infrastructure::csv_writer::{table_to_csv, CsvOptions};
use crate::infrastructure::forest_file::load_forest;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    /// Export workflow, configured from `settings`
    pub export: ExportService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let export = ExportService::from_settings(&settings);
        let settings = Arc::new(settings);

        Self {
            settings,
            fs,
            export,
        }
    }

    /// Load a forest file and prepare it for export.
    pub fn prepare_file(&self, path: &Path) -> InfraResult<PreparedExport> {
        let root = load_forest(self.fs.as_ref(), path)?;
        Ok(self.export.prepare(root)?)
    }

    pub fn csv_options(&self) -> InfraResult<CsvOptions> {
        CsvOptions::from_delimiter(self.settings.csv.delimiter, self.settings.csv.quote_all)
    }

    /// Resolve `path` against the configured output directory.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.settings.output_dir.join(path)
        }
    }

    /// Write `table` as CSV to `path` (relative paths go to the output
    /// directory) and return the path written.
    pub fn write_csv(
        &self,
        table: &Table,
        path: &Path,
        options: CsvOptions,
    ) -> InfraResult<PathBuf> {
        let target = self.output_path(path);
        let content = table_to_csv(table, options)?;
        self.fs
            .ensure_parent(&target)
            .map_err(|e| InfraError::io(format!("create directory for {}", target.display()), e))?;
        self.fs
            .write(&target, content.as_bytes())
            .map_err(|e| InfraError::io(format!("write {}", target.display()), e))?;
        info!(path = %target.display(), rows = table.row_count(), "table exported");
        Ok(target)
    }
}
