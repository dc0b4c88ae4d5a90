//! # gitlod CLI Module
//!
//! ## Available Commands
//!
//! - `serve` - Start the HTTP server
//! - `user` - Emit one person
//! - `repo` - Emit one project
//! - `dump` - Emit every loaded entity
//!
//! Triples go to stdout, logs to stderr.

mod commands;

use crate::config::Config;
use clap::{Parser, Subcommand};
use gitlod_core::{Format, GitlodError};
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// gitlod - GitHub as Linked Data
///
/// Projects GitHub users and repositories into FOAF/DOAP triples.
#[derive(Parser, Debug)]
#[command(name = "gitlod")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format: ttl or nt
    #[arg(short, long, global = true, default_value = "ttl")]
    pub format: Format,

    /// Config file (default: ./gitlod.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Serve records from a JSON fixture instead of GitHub
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    #[must_use]
    pub fn is_serve(&self) -> bool {
        matches!(self.command, Commands::Serve { .. })
    }
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Emit a user as a foaf:Person
    User {
        /// GitHub login
        login: String,

        /// Only the summary fields
        #[arg(long)]
        summary: bool,

        /// Refresh from the source before emitting
        #[arg(long)]
        sync: bool,
    },

    /// Emit a repository as a doap:Project
    Repo {
        /// Owner login
        owner: String,

        /// Repository name
        name: String,
    },

    /// Emit every loaded entity of every kind
    Dump,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve configuration and run the selected command.
pub async fn execute(cli: Cli) -> Result<(), GitlodError> {
    let mut config = Config::discover(cli.config.as_deref())?.with_env()?;
    if let Some(path) = cli.fixture {
        config.use_fixture(path);
    }
    let format = cli.format;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_serve(config).await
        }
        Commands::User {
            login,
            summary,
            sync,
        } => blocking(move || cmd_user(&config, format, &login, summary, sync)).await,
        Commands::Repo { owner, name } => {
            blocking(move || cmd_repo(&config, format, &owner, &name)).await
        }
        Commands::Dump => blocking(move || cmd_dump(&config, format)).await,
    }
}

/// Run a synchronous command off the async runtime.
async fn blocking<F>(work: F) -> Result<(), GitlodError>
where
    F: FnOnce() -> Result<(), GitlodError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| GitlodError::IoError(format!("Worker failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_command_parses() {
        let cli = Cli::try_parse_from(["gitlod", "--format", "nt", "user", "octocat", "--summary"])
            .expect("parse");
        assert_eq!(cli.format, Format::NTriples);
        assert!(matches!(
            cli.command,
            Commands::User { ref login, summary: true, sync: false } if login == "octocat"
        ));
        assert!(!cli.is_serve());
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["gitlod", "dump", "--fixture", "records.json", "-q"])
            .expect("parse");
        assert_eq!(cli.fixture, Some(PathBuf::from("records.json")));
        assert!(cli.quiet);
        assert_eq!(cli.format, Format::Turtle);
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = Cli::try_parse_from(["gitlod", "serve", "-p", "9000"]).expect("parse");
        assert!(cli.is_serve());
        assert!(matches!(
            cli.command,
            Commands::Serve { host: None, port: Some(9000) }
        ));
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(Cli::try_parse_from(["gitlod", "--format", "xml", "dump"]).is_err());
    }
}
