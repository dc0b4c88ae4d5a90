//! # Primitives
//!
//! Fixed runtime constants for gitlod.
//!
//! These values are compiled into the binary and are immutable at runtime.

/// Home page of the account service; also the prefix of every account IRI.
///
/// - Account subject = `GITHUB_HOME + login`
pub const GITHUB_HOME: &str = "http://github.com/";

/// Base of gravatar depiction IRIs. The MD5 hex digest of the email follows.
pub const GRAVATAR_BASE: &str = "http://www.gravatar.com/avatar/";

/// Seed prefix of person blank nodes: `user-{login}`.
pub const PERSON_NODE_PREFIX: &str = "user-";

/// Seed prefix of project blank nodes: `proj-{owner}-{name}`.
pub const PROJECT_NODE_PREFIX: &str = "proj-";

/// Default bound on a single remote call, in milliseconds.
///
/// Sources that perform I/O must not block longer than this per request.
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 10_000;
