//! Domain entities: cell values and the data tree produced by exportable objects

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Scalar content of one table cell.
///
/// Formatting is deterministic so that identical selections on identical
/// forests produce byte-identical output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl CellValue {
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(x) => write!(f, "{x}"),
            CellValue::Bool(true) => f.write_str("yes"),
            CellValue::Bool(false) => f.write_str("no"),
            CellValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Integer(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        CellValue::Integer(i64::from(i))
    }
}

impl From<u32> for CellValue {
    fn from(i: u32) -> Self {
        CellValue::Integer(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        CellValue::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// One key–value attribute of a [`DataNode`].
#[derive(Debug, Clone, PartialEq)]
pub struct DataItem {
    /// Pristine column key
    pub key: String,
    /// Cell content; `Empty` renders as an empty string
    pub value: CellValue,
    /// Cross-cutting attribute source, e.g. `"process"` for attributes every
    /// process carries. Items of row roots sharing `(origin, key)` end up in
    /// one shared column.
    pub origin: Option<String>,
}

impl DataItem {
    pub fn new(key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            origin: None,
        }
    }

    pub fn with_origin(
        key: impl Into<String>,
        value: impl Into<CellValue>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            origin: Some(origin.into()),
        }
    }
}

/// Node of the heterogeneous data tree returned by an exportable object.
///
/// `name` denotes the node's type ("6-chamber deposition", "layer"), not the
/// concrete instance; `descriptive_name` is what appears in the label column
/// when the node becomes a row. It is empty unless set.
#[derive(Debug, Clone, PartialEq)]
pub struct DataNode {
    pub name: String,
    pub descriptive_name: String,
    pub items: Vec<DataItem>,
    pub children: Vec<DataNode>,
}

impl DataNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptive_name: String::new(),
            items: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_descriptive_name(mut self, descriptive_name: impl Into<String>) -> Self {
        self.descriptive_name = descriptive_name.into();
        self
    }

    pub fn with_item(mut self, item: DataItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_child(mut self, child: DataNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push_item(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        self.items.push(DataItem::new(key, value));
    }

    pub fn push_child(&mut self, child: DataNode) {
        self.children.push(child);
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(DataNode::node_count).sum::<usize>()
    }
}

/// Identity of a column group: the disambiguated node name.
///
/// Nodes in different row-trees with equal ids are the same column group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(String);

impl GroupId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
