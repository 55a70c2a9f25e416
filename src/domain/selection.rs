//! Column-group and column selection, and change detection against the
//! selection of the previous request.
//!
//! Group names never contain TAB characters; the previous selection is
//! serialized as TAB-joined group names and space-joined column indices.

use std::collections::BTreeSet;

use itertools::Itertools;

use crate::domain::columns::ColumnLayout;
use crate::domain::error::{DomainError, DomainResult};

pub const FIELD_COLUMN_GROUPS: &str = "column_groups";
pub const FIELD_COLUMNS: &str = "columns";
pub const FIELD_OLD_COLUMNS: &str = "old_columns";

/// Columns offered for one selected column group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnChoiceGroup {
    pub group: String,
    /// `(column index, pristine key)` in ascending index order
    pub columns: Vec<(usize, String)>,
}

/// Names of all column groups, in layout order.
pub fn group_choices(layout: &ColumnLayout) -> Vec<String> {
    layout
        .column_groups
        .iter()
        .map(|g| g.name().to_string())
        .collect()
}

/// Columns offered for the selected groups, in layout order.
pub fn column_choices(
    layout: &ColumnLayout,
    selected_groups: &BTreeSet<String>,
) -> Vec<ColumnChoiceGroup> {
    layout
        .column_groups
        .iter()
        .filter(|g| selected_groups.contains(g.name()))
        .map(|g| ColumnChoiceGroup {
            group: g.name().to_string(),
            columns: g
                .sorted_indices()
                .into_iter()
                .map(|i| (i, layout.columns[i].key.clone()))
                .collect(),
        })
        .collect()
}

/// Indices of every column offered for the selected groups.
pub fn offered_columns(
    layout: &ColumnLayout,
    selected_groups: &BTreeSet<String>,
) -> BTreeSet<usize> {
    column_choices(layout, selected_groups)
        .into_iter()
        .flat_map(|choice| choice.columns.into_iter().map(|(i, _)| i))
        .collect()
}

/// Validate submitted column-group names against the layout.
pub fn parse_group_selection(
    values: &[String],
    layout: &ColumnLayout,
) -> DomainResult<BTreeSet<String>> {
    values
        .iter()
        .map(|value| {
            if layout.column_group_by_name(value).is_some() {
                Ok(value.clone())
            } else {
                Err(DomainError::invalid_selection(
                    FIELD_COLUMN_GROUPS,
                    format!("unknown column group: {value}"),
                ))
            }
        })
        .collect()
}

/// Parse submitted column indices. Duplicates collapse.
pub fn parse_column_indices(values: &[String], field: &str) -> DomainResult<BTreeSet<usize>> {
    values
        .iter()
        .flat_map(|value| value.split_whitespace())
        .map(|token| {
            token.parse::<usize>().map_err(|_| {
                DomainError::invalid_selection(field, "Invalid number in column indices list")
            })
        })
        .collect()
}

/// What the user chose in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub column_groups: BTreeSet<String>,
    pub columns: BTreeSet<usize>,
}

impl SelectionState {
    pub fn new(column_groups: BTreeSet<String>, columns: BTreeSet<usize>) -> Self {
        Self {
            column_groups,
            columns,
        }
    }

    /// Whether this selection differs from the previous request's.
    pub fn differs_from(&self, previous: &PreviousSelection) -> bool {
        self != &previous.0
    }

    /// Selected column indices in ascending order.
    pub fn sorted_columns(&self) -> Vec<usize> {
        self.columns.iter().copied().collect()
    }
}

/// Selection of the previous request, round-tripped through a hidden form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousSelection(pub SelectionState);

impl PreviousSelection {
    /// Parse the two hidden fields.
    pub fn parse(column_groups: &str, columns: &str) -> DomainResult<Self> {
        let groups = column_groups
            .split('\t')
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        let columns = parse_column_indices(&[columns.to_string()], FIELD_OLD_COLUMNS)?;
        Ok(Self(SelectionState::new(groups, columns)))
    }

    /// Serialize into the two hidden fields: `(groups, columns)`.
    pub fn serialize(&self) -> (String, String) {
        let groups = self.0.column_groups.iter().join("\t");
        let columns = self.0.columns.iter().join(" ");
        (groups, columns)
    }

    pub fn state(&self) -> &SelectionState {
        &self.0
    }
}

impl From<SelectionState> for PreviousSelection {
    fn from(state: SelectionState) -> Self {
        Self(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_previous_selection_when_serialized_then_parses_back() {
        let state = SelectionState::new(
            ["Deposition".to_string(), "Deposition, layer 1".to_string()]
                .into_iter()
                .collect(),
            [0, 3, 7].into_iter().collect(),
        );
        let previous = PreviousSelection::from(state.clone());

        let (groups, columns) = previous.serialize();

        assert_eq!(groups, "Deposition\tDeposition, layer 1");
        assert_eq!(columns, "0 3 7");
        assert_eq!(PreviousSelection::parse(&groups, &columns).unwrap().0, state);
    }

    #[test]
    fn given_empty_hidden_fields_when_parsed_then_selection_is_empty() {
        let previous = PreviousSelection::parse("", "").unwrap();
        assert_eq!(previous, PreviousSelection::default());
    }
}
