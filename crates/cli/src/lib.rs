//! dotweave CLI library
//!
//! All CLI logic lives here so it can be tested without spawning the binary.

pub mod cmd;
pub mod command;
pub mod common;
pub mod error;
pub mod stats;
pub mod ui;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

use command::Command;
use common::RuntimeContext;

/// dotweave - render dotfiles from templates
#[derive(Parser)]
#[command(name = "dotweave")]
#[command(about = "Render dotfile templates and reconcile them with your home directory")]
#[command(version)]
#[command(long_about = "Render dotfile templates and reconcile them with your home directory

Each template in the source directory is rendered against a context of
system facts, environment variables and your own variables, then compared
byte for byte with its target. New targets are written, identical ones are
left alone, and changed ones are shown as a diff before anything is
overwritten.")]
pub struct Cli {
    /// Path to the template directory
    #[arg(long, env = "DOTWEAVE_SOURCE_DIR", value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Home directory targets are rendered into (default: $HOME)
    #[arg(long, env = "DOTWEAVE_DEST_DIR", value_name = "DIR")]
    pub dest: Option<PathBuf>,

    /// Path to the config file
    #[arg(long, env = "DOTWEAVE_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (shows DEBUG level logs)
    #[arg(short, long)]
    pub verbose: bool,

    /// Write logs to a file (useful for debugging)
    #[arg(long, env = "DOTWEAVE_LOG_FILE", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for the dotweave CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Render templates and write them to their targets
    #[command(long_about = "Render templates and write them to their targets

Targets that do not exist are created. Targets whose content already matches
are left untouched. For changed targets the diff is shown and you are asked
before overwriting, unless --force is given or the config sets
conflict = \"overwrite\".

Exits with status 1 if any template failed or an overwrite was declined.

Examples:
  • dotweave apply
      → Apply every mapped template

  • dotweave apply --dry-run
      → Show what would change without touching anything

  • dotweave apply bashrc.tmpl gitconfig.tmpl
      → Apply only these two templates")]
    Apply(cmd::apply::ApplyCommand),

    /// Show how targets differ from their rendered templates
    Diff(cmd::diff::DiffCommand),

    /// Inspect templates
    #[command(subcommand)]
    Templates(TemplatesCommands),

    /// Print the variables available to templates
    Variables(cmd::variables::VariablesCommand),
}

/// Template inspection commands
#[derive(Subcommand)]
pub enum TemplatesCommands {
    /// List templates and the targets they render into
    List,

    /// Render a template and print the result
    Show {
        /// Template name relative to the source directory
        #[arg(required = true)]
        name: String,
    },
}

fn execute_command(command: Commands, context: &RuntimeContext) -> Result<()> {
    match command {
        Commands::Apply(apply_cmd) => {
            apply_cmd.execute(context)?;
        }
        Commands::Diff(diff_cmd) => {
            diff_cmd.execute(context)?;
        }
        Commands::Templates(TemplatesCommands::List) => {
            cmd::templates::run_list(context, &mut io::stdout())?;
        }
        Commands::Templates(TemplatesCommands::Show { name }) => {
            cmd::templates::run_show(context, &name, &mut io::stdout())?;
        }
        Commands::Variables(vars_cmd) => {
            vars_cmd.execute(context)?;
        }
    }

    Ok(())
}

/// Run the CLI
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or the command fails
pub fn run(cli: Cli) -> Result<()> {
    dotweave_config::logging::init(cli.verbose, cli.log_file.as_deref())?;

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        rustc = option_env!("VERGEN_RUSTC_SEMVER").unwrap_or("unknown"),
        built = option_env!("VERGEN_BUILD_TIMESTAMP").unwrap_or("unknown"),
        "Starting dotweave"
    );

    let context = RuntimeContext::load(
        cli.config.as_deref(),
        cli.source.as_deref(),
        cli.dest.as_deref(),
    )?;

    execute_command(cli.command, &context)
}
