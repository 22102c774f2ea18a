//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use crate::application::services::InputFormat;
use crate::domain::DepartmentId;

/// Rebuild department hierarchies from flat directory-service records
#[derive(Parser, Debug)]
#[command(name = "deptree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Record format, overrides detection by file extension
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<InputFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show hierarchy as tree
    Tree {
        /// Records file (default: configured records_file)
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Hide department ids
        #[arg(long)]
        no_ids: bool,
    },

    /// List departments in pre-order, indented by depth
    List {
        /// Records file
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Check that the records form a single tree
    Validate {
        /// Records file
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show departments without sub-departments
    Leaves {
        /// Records file
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show path from root to a department
    Branch {
        /// Department id
        id: DepartmentId,
        /// Records file
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },

    /// Show manager user ids of a department
    Managers {
        /// Department id
        id: DepartmentId,
        /// Records file
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
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

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Show config paths
    Path,
}
