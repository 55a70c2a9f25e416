//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint};

/// Export hierarchical lab data as flat tables: column groups, preview, CSV
#[derive(Parser, Debug)]
#[command(name = "labtable")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug output: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding a local .labtable.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List column groups and their columns
    Groups {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Show the disambiguated data forest
    Tree {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Preview the table for a column selection
    Preview {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Export the table for a column selection as CSV
    Export {
        #[command(flatten)]
        source: SourceArgs,
        #[command(flatten)]
        selection: SelectionArgs,
        /// Output file, relative to the configured output directory (default: stdout)
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
        /// Field delimiter (overrides config)
        #[arg(long)]
        delimiter: Option<char>,
        /// Leave out a data row (0-based, repeatable)
        #[arg(long = "skip-row", value_name = "ROW")]
        skip_rows: Vec<usize>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Where the data forest comes from.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Forest file(s); several files become the rows of one export
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Nesting levels whose node names are not prefixed (overrides config)
    #[arg(long)]
    pub renaming_offset: Option<usize>,
}

/// Column selection; omitted groups mean all groups, omitted columns mean
/// all columns of the selected groups. Columns outside the selected groups
/// are rejected.
#[derive(Args, Debug)]
pub struct SelectionArgs {
    /// Column group name (repeatable)
    #[arg(short, long = "group", value_name = "GROUP")]
    pub groups: Vec<String>,

    /// Column index as listed by `groups` (repeatable)
    #[arg(short, long = "column", value_name = "INDEX")]
    pub columns: Vec<usize>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Print a commented config template
    Template,
    /// Show global config file path
    Path,
}
