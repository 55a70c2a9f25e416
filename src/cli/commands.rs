use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::{
    ExportOutcome, ExportRequest, ExportView, ForestAssembler, PreparedExport,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, SelectionArgs, SourceArgs};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::infrastructure::csv_writer::{write_table, CsvOptions};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::forest_file::ForestFileEntity;
use crate::infrastructure::preview::{render_layout, render_table, ForestDisplay};
use crate::infrastructure::InfraError;

/// Root name of a forest assembled from several files.
const ASSEMBLED_ROOT: &str = "labtable export";

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `labtable --help`".to_string(),
        ));
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => {
            let settings = load_settings(cli.project_dir.as_deref(), None)?;
            _config(command, &settings)
        }
        Commands::Groups { source } => {
            let container = container(cli, source)?;
            _groups(&container, source)
        }
        Commands::Tree { source } => {
            let container = container(cli, source)?;
            _tree(&container, source)
        }
        Commands::Preview { source, selection } => {
            let container = container(cli, source)?;
            _preview(&container, source, selection)
        }
        Commands::Export {
            source,
            selection,
            output,
            delimiter,
            skip_rows,
        } => {
            let container = container(cli, source)?;
            _export(
                &container,
                source,
                selection,
                output.as_deref(),
                *delimiter,
                skip_rows,
            )
        }
    }
}

fn load_settings(
    project_dir: Option<&Path>,
    renaming_offset: Option<usize>,
) -> CliResult<Settings> {
    let dir = match project_dir {
        Some(dir) => dir.to_path_buf(),
        None => std::env::current_dir()
            .map_err(|e| InfraError::io("determine current directory", e))?,
    };
    let mut settings = Settings::load(Some(&dir)).map_err(InfraError::from)?;
    if let Some(offset) = renaming_offset {
        settings.renaming_offset = offset;
    }
    debug!(?settings, "settings loaded");
    Ok(settings)
}

fn container(cli: &Cli, source: &SourceArgs) -> CliResult<ServiceContainer> {
    let settings = load_settings(cli.project_dir.as_deref(), source.renaming_offset)?;
    Ok(ServiceContainer::new(settings))
}

/// Load the forest: one file is the whole forest, several files are the
/// row-trees of an assembled forest.
fn prepare(container: &ServiceContainer, source: &SourceArgs) -> CliResult<PreparedExport> {
    if let [path] = source.files.as_slice() {
        return Ok(container.prepare_file(path)?);
    }

    let entities: Vec<ForestFileEntity> = source
        .files
        .iter()
        .map(|path| ForestFileEntity::new(container.fs.clone(), path.clone()))
        .collect();
    let assembled = ForestAssembler::new()
        .assemble(ASSEMBLED_ROOT, &entities, |_| true)
        .map_err(InfraError::from)?;
    for failure in &assembled.failures {
        output::warning(&format!("skipped {}: {}", failure.label, failure.message));
    }
    Ok(container
        .export
        .prepare(assembled.root)
        .map_err(InfraError::from)?)
}

#[instrument(skip(container))]
fn _groups(container: &ServiceContainer, source: &SourceArgs) -> CliResult<()> {
    let prepared = prepare(container, source)?;
    println!("{}", render_layout(&prepared.layout));
    Ok(())
}

#[instrument(skip(container))]
fn _tree(container: &ServiceContainer, source: &SourceArgs) -> CliResult<()> {
    let prepared = prepare(container, source)?;
    println!("{}", prepared.forest.to_tree_string());
    Ok(())
}

fn selected_groups(prepared: &PreparedExport, selection: &SelectionArgs) -> Vec<String> {
    if selection.groups.is_empty() {
        prepared
            .layout
            .column_groups
            .iter()
            .map(|group| group.name().to_string())
            .collect()
    } else {
        selection.groups.clone()
    }
}

#[instrument(skip(container))]
fn _preview(
    container: &ServiceContainer,
    source: &SourceArgs,
    selection: &SelectionArgs,
) -> CliResult<()> {
    let prepared = prepare(container, source)?;
    let request = ExportRequest::initial()
        .with_groups(selected_groups(&prepared, selection))
        .with_columns(selection.columns.iter().copied());

    match container
        .export
        .process(&prepared, &request)
        .map_err(InfraError::from)?
    {
        ExportOutcome::Choose(view) => {
            output::warning("no columns selected");
            print_choices(&view);
        }
        ExportOutcome::Preview { view, table, .. } => {
            print_choices(&view);
            println!();
            output::header("Preview");
            println!("{}", render_table(&table));
        }
        ExportOutcome::Export { table, .. } => {
            println!("{}", render_table(&table));
        }
    }
    Ok(())
}

fn print_choices(view: &ExportView) {
    output::header("Column groups");
    for group in &view.group_choices {
        if view.selection.column_groups.contains(group) {
            output::success_detail(group);
        } else {
            output::detail(group);
        }
    }
    for choice in &view.column_choices {
        output::header(&choice.group);
        for (index, key) in &choice.columns {
            let line = format!("[{index}] {key}");
            if view.selection.columns.contains(index) {
                output::success_detail(&line);
            } else {
                output::detail(&line);
            }
        }
    }
}

#[instrument(skip(container))]
fn _export(
    container: &ServiceContainer,
    source: &SourceArgs,
    selection: &SelectionArgs,
    output_path: Option<&Path>,
    delimiter: Option<char>,
    skip_rows: &[usize],
) -> CliResult<()> {
    let prepared = prepare(container, source)?;
    let groups = selected_groups(&prepared, selection);
    let table = container
        .export
        .export_selection(&prepared, &groups, &selection.columns, |row| {
            !skip_rows.contains(&row)
        })
        .map_err(InfraError::from)?;

    let options = match delimiter {
        Some(delimiter) => CsvOptions::from_delimiter(delimiter, container.settings.csv.quote_all)?,
        None => container.csv_options()?,
    };

    match output_path {
        Some(path) => {
            let written: PathBuf = container.write_csv(&table, path, options)?;
            output::success(&format!(
                "exported {} rows to {}",
                table.row_count(),
                written.display()
            ));
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            write_table(&table, &mut handle, options)?;
            handle
                .flush()
                .map_err(|e| InfraError::io("flush stdout", e))?;
        }
    }
    Ok(())
}

fn _config(command: &ConfigCommands, settings: &Settings) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let toml = settings.to_toml().map_err(InfraError::from)?;
            print!("{toml}");
        }
        ConfigCommands::Template => print!("{}", Settings::template()),
        ConfigCommands::Path => match global_config_path() {
            Some(path) => println!("{}", path.display()),
            None => output::warning("no home directory, global config unavailable"),
        },
    }
    Ok(())
}
