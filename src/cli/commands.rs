//! Command dispatch

use std::io;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{SeedOutcome, TreeConvert};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::output;
use crate::cli::session::run_session;
use crate::cli::CliResult;
use crate::config::{global_config_path, Settings};
use crate::infrastructure::di::ServiceContainer;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Some(Commands::Config { command }) => _config(cli, command),
        Some(Commands::Session) => _session(cli),
        Some(Commands::Show) | None => _show(cli),
    }
}

/// Settings from the config layers, then command-line flags on top.
fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(file) = &cli.seed_file {
        settings.seed_file = Some(file.clone());
    }
    // an explicit URL beats any configured file
    if let Some(url) = &cli.seed_url {
        settings.seed_url = url.clone();
        settings.seed_file = None;
    }
    if cli.no_seed {
        settings.auto_seed = false;
    }
    debug!(?settings, "effective settings");
    Ok(settings)
}

fn start(cli: &Cli) -> CliResult<ServiceContainer> {
    let mut container = ServiceContainer::new(load_settings(cli)?);
    if let SeedOutcome::Loaded { topics, questions } = container.bootstrap() {
        output::success(&format!("loaded {topics} topics, {questions} questions"));
    }
    Ok(container)
}

#[instrument(skip(cli))]
fn _show(cli: &Cli) -> CliResult<()> {
    let container = start(cli)?;
    output::info(&container.store().forest().to_tree_string());
    Ok(())
}

#[instrument(skip(cli))]
fn _session(cli: &Cli) -> CliResult<()> {
    let mut container = start(cli)?;
    output::header("qsheet session, type 'help' for commands");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_session(container.store_mut(), stdin.lock(), &mut stdout)?;
    Ok(())
}

#[instrument(skip(cli))]
fn _config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = load_settings(cli)?;
            output::info(&settings.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => output::warning("no config directory available on this platform"),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}
