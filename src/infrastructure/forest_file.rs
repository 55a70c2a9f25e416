//! Forest files: data trees stored as TOML
//!
//! ```toml
//! name = "sample series"
//!
//! [[children]]
//! name = "6-chamber deposition"
//! descriptive_name = "08B-410"
//!
//! [[children.items]]
//! key = "number"
//! value = "08B-410"
//! origin = "deposition"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::services::{DataError, Exportable};
use crate::domain::{CellValue, DataItem, DataNode};
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};

#[derive(Debug, Deserialize)]
struct FileNode {
    name: String,
    #[serde(default)]
    descriptive_name: Option<String>,
    #[serde(default)]
    items: Vec<FileItem>,
    #[serde(default)]
    children: Vec<FileNode>,
}

#[derive(Debug, Deserialize)]
struct FileItem {
    key: String,
    #[serde(default)]
    value: Option<toml::Value>,
    #[serde(default)]
    origin: Option<String>,
}

/// Read and parse a forest file.
#[instrument(level = "debug", skip(fs))]
pub fn load_forest(fs: &dyn FileSystem, path: &Path) -> InfraResult<DataNode> {
    let content = fs
        .read_to_string(path)
        .map_err(|e| InfraError::io(format!("read forest file {}", path.display()), e))?;
    parse_forest(&content, path)
}

/// Parse forest file content; `path` is used for error messages only.
pub fn parse_forest(content: &str, path: &Path) -> InfraResult<DataNode> {
    let file_node: FileNode = toml::from_str(content).map_err(|e| InfraError::ForestFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let node = convert_node(file_node).map_err(|message| InfraError::ForestFile {
        path: path.to_path_buf(),
        message,
    })?;
    debug!(nodes = node.node_count(), "forest file parsed");
    Ok(node)
}

/// A forest file contributing one row-tree to an assembled export.
pub struct ForestFileEntity {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl ForestFileEntity {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }
}

impl Exportable for ForestFileEntity {
    /// File stem, e.g. `08B-410` for `08B-410.toml`.
    fn label(&self) -> String {
        self.path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn get_data(&self) -> Result<DataNode, DataError> {
        load_forest(self.fs.as_ref(), &self.path).map_err(|e| DataError::new(e.to_string()))
    }
}

fn convert_node(file_node: FileNode) -> Result<DataNode, String> {
    let FileNode {
        name,
        descriptive_name,
        items,
        children,
    } = file_node;
    let mut node = DataNode::new(name);
    node.descriptive_name = descriptive_name.unwrap_or_default();
    for item in items {
        let value = match item.value {
            Some(value) => convert_value(value)
                .map_err(|message| format!("{} / {}: {message}", node.name, item.key))?,
            None => CellValue::Empty,
        };
        node.items.push(DataItem {
            key: item.key,
            value,
            origin: item.origin,
        });
    }
    for child in children {
        node.children.push(convert_node(child)?);
    }
    Ok(node)
}

fn convert_value(value: toml::Value) -> Result<CellValue, String> {
    match value {
        toml::Value::String(s) => Ok(CellValue::Text(s)),
        toml::Value::Integer(i) => Ok(CellValue::Integer(i)),
        toml::Value::Float(x) => Ok(CellValue::Float(x)),
        toml::Value::Boolean(b) => Ok(CellValue::Bool(b)),
        toml::Value::Datetime(dt) => {
            let Some(date) = dt.date else {
                return Ok(CellValue::Text(dt.to_string()));
            };
            let day = NaiveDate::from_ymd_opt(
                i32::from(date.year),
                u32::from(date.month),
                u32::from(date.day),
            )
            .ok_or_else(|| format!("invalid date {dt}"))?;
            match dt.time {
                None => Ok(CellValue::Date(day)),
                Some(time) => day
                    .and_hms_nano_opt(
                        u32::from(time.hour),
                        u32::from(time.minute),
                        u32::from(time.second),
                        time.nanosecond,
                    )
                    .map(CellValue::DateTime)
                    .ok_or_else(|| format!("invalid time {dt}")),
            }
        }
        toml::Value::Array(_) | toml::Value::Table(_) => {
            Err("values must be scalars".to_string())
        }
    }
}
