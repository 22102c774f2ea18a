//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, Settings};
use crate::domain::{DepartmentId, TreeRender};
use crate::infrastructure::ServiceContainer;

/// Load settings, wire up services and run the selected command.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    let container = ServiceContainer::new(settings);
    execute_with(cli, &container)
}

/// Run the selected command against an already wired container.
#[instrument(level = "debug", skip(container))]
pub fn execute_with(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage("no command given, see --help".to_string()));
    };
    match command {
        Commands::Tree { file, no_ids } => tree(cli, container, file.as_deref(), !no_ids),
        Commands::List { file } => list(cli, container, file.as_deref()),
        Commands::Validate { file } => validate(cli, container, file.as_deref()),
        Commands::Leaves { file } => leaves(cli, container, file.as_deref()),
        Commands::Branch { id, file } => branch(cli, container, file.as_deref(), *id),
        Commands::Managers { id, file } => managers(cli, container, file.as_deref(), *id),
        Commands::Config { command } => config_command(container, command),
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
    }
}

/// Explicit file argument, else the configured default.
fn records_file(container: &ServiceContainer, file: Option<&Path>) -> CliResult<PathBuf> {
    file.map(Path::to_path_buf)
        .or_else(|| container.settings.records_file.clone())
        .ok_or(CliError::Application(ApplicationError::NoInput))
}

fn load_tree(
    cli: &Cli,
    container: &ServiceContainer,
    file: Option<&Path>,
) -> CliResult<crate::domain::DepartmentTree> {
    let path = records_file(container, file)?;
    debug!("records file: {}", path.display());
    Ok(container.directory.load_tree(&path, cli.format)?)
}

fn tree(cli: &Cli, container: &ServiceContainer, file: Option<&Path>, ids: bool) -> CliResult<()> {
    let tree = load_tree(cli, container, file)?;
    let show_ids = ids && container.settings.show_ids;
    output::info(&tree.to_tree_string(show_ids));
    Ok(())
}

fn list(cli: &Cli, container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(cli, container, file)?;
    for (depth, node) in tree.iter_with_depth() {
        output::info(&format!(
            "{}{}\t{}",
            "  ".repeat(depth),
            node.department.id,
            node.department.name
        ));
    }
    Ok(())
}

fn validate(cli: &Cli, container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(cli, container, file)?;
    output::success(&format!(
        "{} departments, depth {}, root: {}",
        tree.len(),
        tree.depth(),
        tree.root_node().department
    ));
    Ok(())
}

fn leaves(cli: &Cli, container: &ServiceContainer, file: Option<&Path>) -> CliResult<()> {
    let tree = load_tree(cli, container, file)?;
    for department in tree.leaf_nodes() {
        output::info(department);
    }
    Ok(())
}

fn branch(
    cli: &Cli,
    container: &ServiceContainer,
    file: Option<&Path>,
    id: DepartmentId,
) -> CliResult<()> {
    let tree = load_tree(cli, container, file)?;
    let path = tree
        .branch(id)
        .ok_or(ApplicationError::DepartmentNotFound(id))?;
    output::info(&path.iter().rev().join(" <- "));
    Ok(())
}

fn managers(
    cli: &Cli,
    container: &ServiceContainer,
    file: Option<&Path>,
    id: DepartmentId,
) -> CliResult<()> {
    let tree = load_tree(cli, container, file)?;
    let node = container.directory.department(&tree, id)?;
    for user_id in node.department.manager_user_ids() {
        output::info(user_id);
    }
    Ok(())
}

fn config_command(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::header("# merged settings");
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::info("no config directory available"),
        },
    }
    Ok(())
}
