//! Table export workflow
//!
//! Drives the interactive export: the caller first picks column groups, then
//! columns, sees a preview, and finally submits the unchanged selection
//! together with the rows to keep.

use std::collections::BTreeSet;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::selection::{
    column_choices, group_choices, offered_columns, parse_column_indices, parse_group_selection,
    ColumnChoiceGroup, FIELD_COLUMNS,
};
use crate::domain::{
    build_column_layout, flatten_forest, generate_table, ColumnLayout, DataForest, DataNode,
    DomainError, FlatRow, PreviousSelection, SelectionState, Table,
};

/// Form data of one export request.
///
/// `column_groups == None` means nothing was submitted yet.
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    pub column_groups: Option<Vec<String>>,
    pub columns: Vec<String>,
    pub old_column_groups: Option<String>,
    pub old_columns: Option<String>,
    pub active_rows: Option<Vec<bool>>,
}

impl ExportRequest {
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.column_groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_columns<I>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.columns = columns.into_iter().map(|i| i.to_string()).collect();
        self
    }

    /// Attach the hidden fields returned by the previous outcome.
    pub fn with_previous(mut self, previous: &PreviousSelection) -> Self {
        let (groups, columns) = previous.serialize();
        self.old_column_groups = Some(groups);
        self.old_columns = Some(columns);
        self
    }

    pub fn with_active_rows(mut self, active_rows: Vec<bool>) -> Self {
        self.active_rows = Some(active_rows);
        self
    }
}

/// Choices and current selection presented to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportView {
    pub group_choices: Vec<String>,
    pub column_choices: Vec<ColumnChoiceGroup>,
    pub selection: SelectionState,
    /// Hidden state to send back with the next request
    pub previous: PreviousSelection,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    /// No columns selected yet
    Choose(ExportView),
    /// Selection changed or rows not yet confirmed
    Preview {
        view: ExportView,
        table: Table,
        active_rows: Vec<bool>,
    },
    /// Final table, restricted to the active rows
    Export {
        table: Table,
        previous: PreviousSelection,
    },
}

/// Forest, layout, and flattened rows of one export, built once per request.
#[derive(Debug)]
pub struct PreparedExport {
    pub forest: DataForest,
    pub layout: ColumnLayout,
    pub labels: Vec<String>,
    rows: Vec<FlatRow>,
}

impl PreparedExport {
    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }
}

/// Service running the export workflow.
#[derive(Debug, Clone)]
pub struct ExportService {
    renaming_offset: usize,
    label_heading: String,
}

impl ExportService {
    pub fn new(renaming_offset: usize, label_heading: impl Into<String>) -> Self {
        Self {
            renaming_offset,
            label_heading: label_heading.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.renaming_offset, settings.label_heading.clone())
    }

    pub fn label_heading(&self) -> &str {
        &self.label_heading
    }

    /// Disambiguate, lay out, and flatten the forest rooted at `root`.
    #[instrument(level = "debug", skip(self, root), fields(root = %root.name))]
    pub fn prepare(&self, root: DataNode) -> ApplicationResult<PreparedExport> {
        let forest = DataForest::from_root(root, self.renaming_offset);
        let layout = build_column_layout(&forest)?;
        let rows = flatten_forest(&forest);
        let labels = forest.descriptive_names();
        info!(
            rows = rows.len(),
            groups = layout.column_groups.len(),
            columns = layout.columns.len(),
            "export prepared"
        );
        Ok(PreparedExport {
            forest,
            layout,
            labels,
            rows,
        })
    }

    /// Table with the given columns (in the given order) for all rows.
    pub fn table(&self, prepared: &PreparedExport, selected: &[usize]) -> ApplicationResult<Table> {
        Ok(generate_table(
            &prepared.rows,
            &prepared.layout.columns,
            selected,
            &prepared.labels,
            &self.label_heading,
        )?)
    }

    /// Table with every column.
    pub fn table_all(&self, prepared: &PreparedExport) -> ApplicationResult<Table> {
        self.table(prepared, &prepared.layout.all_indices())
    }

    /// Run one step of the interactive workflow.
    #[instrument(level = "debug", skip_all)]
    pub fn process(
        &self,
        prepared: &PreparedExport,
        request: &ExportRequest,
    ) -> ApplicationResult<ExportOutcome> {
        let layout = &prepared.layout;

        let Some(submitted_groups) = &request.column_groups else {
            debug!("no selection submitted");
            return Ok(ExportOutcome::Choose(self.view(layout, SelectionState::default())));
        };

        let previous = match PreviousSelection::parse(
            request.old_column_groups.as_deref().unwrap_or_default(),
            request.old_columns.as_deref().unwrap_or_default(),
        ) {
            Ok(previous) => previous,
            Err(e) => {
                warn!(error = %e, "discarding invalid previous selection");
                PreviousSelection::default()
            }
        };

        let selected_groups = parse_group_selection(submitted_groups, layout)?;
        let offered = offered_columns(layout, &selected_groups);
        let submitted = parse_column_indices(&request.columns, FIELD_COLUMNS)?;

        let columns = if !submitted.is_empty() && submitted.is_subset(&offered) {
            submitted
        } else {
            // Columns of deselected groups drop out; newly selected groups
            // start with all their columns.
            let added: BTreeSet<String> = selected_groups
                .difference(&previous.state().column_groups)
                .cloned()
                .collect();
            submitted
                .intersection(&offered)
                .copied()
                .chain(offered_columns(layout, &added))
                .collect()
        };

        let selection = SelectionState::new(selected_groups, columns);
        let changed = selection.differs_from(&previous);
        debug!(changed, columns = selection.columns.len(), "selection parsed");

        if selection.columns.is_empty() {
            return Ok(ExportOutcome::Choose(self.view(layout, selection)));
        }

        let mut table = self.table(prepared, &selection.sorted_columns())?;

        if !changed {
            if let Some(active_rows) = &request.active_rows {
                table.retain_rows(active_rows)?;
                info!(rows = table.row_count(), "export confirmed");
                return Ok(ExportOutcome::Export {
                    table,
                    previous: PreviousSelection::from(selection),
                });
            }
        }

        let active_rows = vec![true; table.row_count()];
        Ok(ExportOutcome::Preview {
            view: self.view(layout, selection),
            table,
            active_rows,
        })
    }

    /// Run the workflow to completion for a non-interactive caller: submit
    /// `groups` and `columns`, confirm the preview, and keep the rows for
    /// which `keep_row` returns true.
    ///
    /// Every requested column must belong to one of `groups`; an empty
    /// `columns` selects all columns of the groups.
    pub fn export_selection<F>(
        &self,
        prepared: &PreparedExport,
        groups: &[String],
        columns: &[usize],
        keep_row: F,
    ) -> ApplicationResult<Table>
    where
        F: Fn(usize) -> bool,
    {
        let selected_groups = parse_group_selection(groups, &prepared.layout)?;
        let offered = offered_columns(&prepared.layout, &selected_groups);
        if let Some(column) = columns.iter().find(|&&c| !offered.contains(&c)) {
            return Err(DomainError::invalid_selection(
                FIELD_COLUMNS,
                format!("column {column} is not offered by the selected column groups"),
            )
            .into());
        }

        let request = ExportRequest::initial()
            .with_groups(groups.iter().cloned())
            .with_columns(columns.iter().copied());
        match self.process(prepared, &request)? {
            ExportOutcome::Preview { view, table, .. } => {
                let active_rows = (0..table.row_count()).map(keep_row).collect();
                let confirm = ExportRequest::initial()
                    .with_groups(view.selection.column_groups.iter().cloned())
                    .with_columns(view.selection.sorted_columns())
                    .with_previous(&view.previous)
                    .with_active_rows(active_rows);
                match self.process(prepared, &confirm)? {
                    ExportOutcome::Export { table, .. } => Ok(table),
                    _ => Err(ApplicationError::NothingToExport(
                        "selection was not confirmed".to_string(),
                    )),
                }
            }
            ExportOutcome::Choose(_) => Err(ApplicationError::NothingToExport(
                "no columns selected".to_string(),
            )),
            ExportOutcome::Export { table, .. } => Ok(table),
        }
    }

    fn view(&self, layout: &ColumnLayout, selection: SelectionState) -> ExportView {
        ExportView {
            group_choices: group_choices(layout),
            column_choices: column_choices(layout, &selection.column_groups),
            previous: PreviousSelection::from(selection.clone()),
            selection,
        }
    }
}
