//! # CLI Command Implementations
//!
//! Everything except `serve` is synchronous and runs on the blocking pool.

use crate::api::{self, AppState};
use crate::config::{Config, SourceKind};
use crate::source;
use gitlod_core::{
    EmitReport, Entity, Format, GitlodError, Mode, Person, Project, TripleSink, TypeRegistry,
};
use std::io::Write;

/// Serialize what `work` emits to stdout.
fn write_stdout<F>(format: Format, work: F) -> Result<EmitReport, GitlodError>
where
    F: FnOnce(&mut dyn TripleSink) -> Result<EmitReport, GitlodError>,
{
    let stdout = std::io::stdout();
    let mut writer = format.writer(stdout.lock());
    let report = work(&mut writer)?;
    writer.finish()?.flush()?;

    if !report.is_complete() {
        tracing::warn!(
            skipped = report.failed.len(),
            "Some references could not be resolved; output is partial"
        );
    }
    tracing::debug!(triples = report.triples, %format, "written");
    Ok(report)
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config: Config) -> Result<(), GitlodError> {
    let source_config = config.source.clone();
    // The GitHub client blocks; build it off the runtime.
    let source = tokio::task::spawn_blocking(move || source::open(&source_config))
        .await
        .map_err(|e| GitlodError::IoError(format!("Worker failed: {}", e)))??;
    let registry = TypeRegistry::standard()?;
    let traversal = config.traversal();

    println!("gitlod Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Address:    {}", config.server.addr());
    match config.source.kind {
        SourceKind::Github => println!("  Source:     {}", config.source.api_url),
        SourceKind::Fixture => println!("  Source:     fixture"),
    }
    println!("  On failure: {:?}", traversal.policy());
    println!();
    println!("Endpoints:");
    println!("  GET /users                    - Every loaded entity");
    println!("  GET /users/{{login}}            - One person");
    println!("  GET /users/{{login}}/repos/{{r}}  - One project");
    println!("  GET /repos                    - Every loaded entity");
    println!("  GET /health                   - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let state = AppState::new(source, registry, traversal);
    api::run_server(state, &config.server).await
}

// =============================================================================
// USER COMMAND
// =============================================================================

/// Emit one person.
///
/// `sync` forces a refresh; otherwise the person is fetched only as far as
/// it is incomplete.
pub fn cmd_user(
    config: &Config,
    format: Format,
    login: &str,
    summary: bool,
    sync: bool,
) -> Result<(), GitlodError> {
    let source = source::open(&config.source)?;
    let mut person = Person::get(source, login)?;
    if sync {
        person.sync()?;
    } else {
        person.fetch()?;
    }

    let mode = if summary { Mode::Summary } else { Mode::Full };
    let traversal = config.traversal();
    write_stdout(format, |sink| traversal.emit(&mut person, mode, sink))?;
    Ok(())
}

// =============================================================================
// REPO COMMAND
// =============================================================================

/// Emit one project.
pub fn cmd_repo(
    config: &Config,
    format: Format,
    owner: &str,
    name: &str,
) -> Result<(), GitlodError> {
    let source = source::open(&config.source)?;
    let mut project = Project::get(source, owner, name)?;
    project.fetch()?;

    let traversal = config.traversal();
    write_stdout(format, |sink| traversal.emit(&mut project, Mode::Full, sink))?;
    Ok(())
}

// =============================================================================
// DUMP COMMAND
// =============================================================================

/// Emit every loaded entity of every registered kind.
pub fn cmd_dump(config: &Config, format: Format) -> Result<(), GitlodError> {
    let source = source::open(&config.source)?;
    let registry = TypeRegistry::standard()?;
    let view = registry
        .union_view(source)
        .with_traversal(config.traversal());

    let report = write_stdout(format, |sink| view.emit(Mode::Full, sink))?;
    if report.triples == 0 && config.source.kind == SourceKind::Github {
        tracing::warn!("Nothing loaded yet; dump only covers records the source has mirrored");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_config(dir: &tempfile::TempDir) -> Config {
        let path = dir.path().join("records.json");
        std::fs::write(
            &path,
            br#"{
                "users": [{"login": "alice", "name": "Alice"}],
                "repos": [{"owner": {"login": "alice"}, "name": "rdf"}]
            }"#,
        )
        .expect("write");
        let mut config = Config::default();
        config.use_fixture(path);
        config
    }

    #[test]
    fn user_and_repo_commands_run_against_fixture() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = fixture_config(&dir);

        cmd_user(&config, Format::NTriples, "alice", false, false).expect("user");
        cmd_user(&config, Format::Turtle, "alice", true, true).expect("user summary");
        cmd_repo(&config, Format::Turtle, "alice", "rdf").expect("repo");
        cmd_dump(&config, Format::NTriples).expect("dump");
    }

    #[test]
    fn unknown_user_is_not_found() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = fixture_config(&dir);
        assert!(matches!(
            cmd_user(&config, Format::Turtle, "nobody", false, false),
            Err(GitlodError::RecordNotFound(_))
        ));
    }
}
