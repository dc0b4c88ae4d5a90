//! # gitlod - GitHub as Linked Data
//!
//! Serves GitHub users and repositories as FOAF/DOAP triples.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                 apps/gitlod (THE BINARY)                │
//! │                                                         │
//! │  ┌─────────────┐   ┌─────────────┐   ┌──────────────┐   │
//! │  │    CLI      │   │  HTTP API   │   │ GitHubSource │   │
//! │  │   (clap)    │   │   (axum)    │   │  (reqwest)   │   │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬───────┘   │
//! │         └─────────────────┼─────────────────┘           │
//! │                           ▼                             │
//! │                   ┌───────────────┐                     │
//! │                   │  gitlod-core  │                     │
//! │                   │ (THE ENGINE)  │                     │
//! │                   └───────────────┘                     │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Serve the live GitHub API
//! gitlod serve --port 8080
//!
//! # Offline, from a fixture
//! gitlod --fixture records.json user octocat --format nt
//! gitlod --fixture records.json dump
//! ```

use clap::Parser;
use gitlod::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // GITLOD_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("GITLOD_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gitlod=info,gitlod_core=info,tower_http=debug".into());

    // Logs go to stderr; stdout carries the serialized triples.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && cli.is_serve() {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
   ██████╗ ██╗████████╗██╗      ██████╗ ██████╗
  ██╔════╝ ██║╚══██╔══╝██║     ██╔═══██╗██╔══██╗
  ██║  ███╗██║   ██║   ██║     ██║   ██║██║  ██║
  ██║   ██║██║   ██║   ██║     ██║   ██║██║  ██║
  ╚██████╔╝██║   ██║   ███████╗╚██████╔╝██████╔╝
   ╚═════╝ ╚═╝   ╚═╝   ╚══════╝ ╚═════╝ ╚═════╝

  GitHub as Linked Data v{}

  FOAF • DOAP • One Hop
"#,
        env!("CARGO_PKG_VERSION")
    );
}
