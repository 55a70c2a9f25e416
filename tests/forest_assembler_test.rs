//! Integration tests for assembling an export forest from exportable entities.

use labtable::application::services::{DataError, Exportable, ForestAssembler};
use labtable::application::ApplicationError;
use labtable::domain::{DataItem, DataNode};

struct Sample {
    name: &'static str,
    corrupt: bool,
    restricted: bool,
}

impl Sample {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            corrupt: false,
            restricted: false,
        }
    }
}

impl Exportable for Sample {
    fn label(&self) -> String {
        self.name.to_string()
    }

    fn get_data(&self) -> Result<DataNode, DataError> {
        if self.corrupt {
            return Err(DataError::new("deposition record is missing"));
        }
        Ok(DataNode::new("sample")
            .with_child(DataNode::new("PECVD").with_item(DataItem::new("number", self.name))))
    }
}

#[test]
fn given_viewable_samples_when_assembled_then_one_row_per_sample() {
    // Arrange
    let samples = vec![Sample::new("08B-410"), Sample::new("08B-411")];

    // Act
    let assembled = ForestAssembler::new()
        .assemble("series", &samples, |_| true)
        .unwrap();

    // Assert
    assert_eq!(assembled.root.name, "series");
    assert_eq!(assembled.root.children.len(), 2);
    assert_eq!(assembled.labels(), vec!["08B-410", "08B-411"]);
    assert!(assembled.failures.is_empty());
}

#[test]
fn given_corrupt_sample_when_assembled_then_others_exported_and_failure_reported() {
    // Arrange
    let mut broken = Sample::new("08B-411");
    broken.corrupt = true;
    let samples = vec![Sample::new("08B-410"), broken, Sample::new("08B-412")];

    // Act
    let assembled = ForestAssembler::new()
        .assemble("series", &samples, |_| true)
        .unwrap();

    // Assert
    assert_eq!(assembled.labels(), vec!["08B-410", "08B-412"]);
    assert_eq!(assembled.failures.len(), 1);
    assert_eq!(assembled.failures[0].label, "08B-411");
    assert_eq!(assembled.failures[0].message, "deposition record is missing");
}

#[test]
fn given_restricted_sample_when_assembled_then_whole_export_is_denied() {
    let mut secret = Sample::new("08B-413");
    secret.restricted = true;
    let samples = vec![Sample::new("08B-410"), secret];

    let result = ForestAssembler::new().assemble("series", &samples, |s| !s.restricted);

    match result {
        Err(ApplicationError::PermissionDenied(label)) => assert_eq!(label, "08B-413"),
        other => panic!("expected permission denied, got {other:?}"),
    }
}

#[test]
fn given_data_nodes_when_assembled_then_descriptive_names_become_labels() {
    let processes = vec![
        DataNode::new("PDS measurement").with_descriptive_name("PDS #1"),
        DataNode::new("PDS measurement").with_descriptive_name("PDS #2"),
    ];

    let assembled = ForestAssembler::new()
        .assemble("notebook", &processes, |_| true)
        .unwrap();

    assert_eq!(assembled.labels(), vec!["PDS #1", "PDS #2"]);
    assert_eq!(assembled.root.children[0].name, "PDS measurement");
}
