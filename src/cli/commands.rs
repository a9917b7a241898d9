//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::cli::args::{Cli, Commands, ConfigCommands, OrgCommands, TokenCommands};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{Levels, MemberData, OrganizationStatus, TreeType};
use crate::infrastructure::di::ServiceContainer;
use crate::tree_traits::TreeNodeConvert;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let project_dir = match &cli.project_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()
            .map_err(|e| crate::infrastructure::InfraError::io("resolve current directory", e))?,
    };

    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => config_command(command, &project_dir),
        Some(command) => {
            let settings = Settings::load(Some(&project_dir))?;
            debug!("settings: {:?}", settings);
            let container = ServiceContainer::new(settings);
            match command {
                Commands::Org { command } => org_command(command, &container),
                Commands::Tokens { command } => token_command(command, &container),
                Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
            }
        }
        None => Err(CliError::Usage(
            "no command given, see --help".to_string(),
        )),
    }
}

#[instrument(skip(container))]
fn org_command(command: &OrgCommands, container: &ServiceContainer) -> CliResult<()> {
    let service = &container.organization;
    match command {
        OrgCommands::Levels { file, json } => {
            let levels = service.levels(file)?;
            if *json {
                let rendered = serde_json::to_string_pretty(&levels)
                    .map_err(|e| CliError::Usage(format!("render levels: {}", e)))?;
                output::info(&rendered);
            } else {
                print_levels(&levels, container);
            }
            Ok(())
        }
        OrgCommands::Tree { file } => {
            match service.load_root(file)? {
                Some(root) => output::info(&root.to_tree_string()),
                None => output::warning("organization is empty"),
            }
            Ok(())
        }
        OrgCommands::Place {
            file,
            sponsor,
            id,
            name,
            rank,
            binary,
        } => {
            let tree_type = if *binary {
                TreeType::Binary
            } else {
                container.settings.tree_type
            };
            let member = MemberData {
                node_id: id.clone(),
                name: name.clone(),
                rank: rank.clone(),
                pv_left: 0,
                pv_right: 0,
                status: OrganizationStatus::Active,
            };
            let (arena, placement) = service.place(file, sponsor, member, tree_type)?;
            let position = placement
                .position
                .map(|p| format!(" leg {}", p))
                .unwrap_or_default();
            output::success(&format!(
                "{} placed below {}{} at depth {} ({})",
                id, placement.parent_id, position, placement.depth, tree_type
            ));
            if placement.spillover {
                output::detail(&format!("spillover from sponsor {}", sponsor));
            }
            output::info(&arena.to_tree_string());
            Ok(())
        }
    }
}

fn print_levels(levels: &Levels, container: &ServiceContainer) {
    let summary = container.organization.summary(levels);
    for (row, totals) in levels.iter().zip(summary) {
        output::header(&format!(
            "Level {} ({} members, PV {} / {})",
            totals.depth, totals.width, totals.pv_left, totals.pv_right
        ));
        for node in row {
            output::detail(&format!(
                "{} {} ({}) 직급 {}  PV {} / {}",
                output::badge(node.status),
                node.name,
                node.id,
                node.rank,
                node.pv_left,
                node.pv_right
            ));
        }
    }
}

#[instrument(skip(container))]
fn token_command(command: &TokenCommands, container: &ServiceContainer) -> CliResult<()> {
    let tokens = &container.tokens;
    match command {
        TokenCommands::List => {
            let categories = tokens.available_categories()?;
            if categories.is_empty() {
                output::warning(&format!(
                    "no token bundles in {}",
                    tokens.tokens_dir().display()
                ));
            }
            for category in categories {
                output::info(&category);
            }
            Ok(())
        }
        TokenCommands::Get { category, path } => {
            let value = tokens.get_token(category, path)?;
            match value {
                serde_json::Value::String(s) => output::info(&s),
                other => output::info(&other),
            }
            Ok(())
        }
        TokenCommands::Export { dist } => {
            let dist_dir = dist
                .clone()
                .unwrap_or_else(|| container.settings.dist_dir.clone());
            let written = tokens.write_exports(&dist_dir)?;
            output::header("Design token exports generated:");
            for path in written {
                output::detail(&path.display());
            }
            Ok(())
        }
    }
}

fn config_command(command: &ConfigCommands, project_dir: &Path) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(Some(project_dir))?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            output::action("local", &local_config_path(project_dir).display());
            Ok(())
        }
    }
}
