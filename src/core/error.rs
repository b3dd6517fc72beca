//! Error types for chartstamp with contextual messages and exit codes
//!
//! This module provides a unified error type that categorizes errors and provides
//! contextual help messages to users. Every fatal error names the offending
//! value (a version string, a values path) so operators can fix configuration
//! without digging through the repository.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for chartstamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, invalid args, missing files)
  User = 1,
  /// System error (git, I/O)
  System = 2,
  /// Validation failure (version ordering, document shape)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for chartstamp
#[derive(Debug)]
pub enum StampError {
  /// Configuration errors
  Config(ConfigError),

  /// Git query errors
  Git(GitError),

  /// Version derivation and validation errors
  Version(VersionError),

  /// Value-tree patching errors
  Values(ValuesError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl StampError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    StampError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    StampError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      StampError::Message { message, context, help } => StampError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      _ => self,
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      StampError::Config(_) => ExitCode::User,
      StampError::Git(_) => ExitCode::System,
      StampError::Version(_) => ExitCode::Validation,
      StampError::Values(_) => ExitCode::Validation,
      StampError::Io(_) => ExitCode::System,
      StampError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      StampError::Config(e) => e.help_message(),
      StampError::Version(e) => e.help_message(),
      StampError::Values(e) => e.help_message(),
      StampError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for StampError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      StampError::Config(e) => write!(f, "{}", e),
      StampError::Git(e) => write!(f, "{}", e),
      StampError::Version(e) => write!(f, "{}", e),
      StampError::Values(e) => write!(f, "{}", e),
      StampError::Io(e) => write!(f, "I/O error: {}", e),
      StampError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for StampError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      StampError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for StampError {
  fn from(err: io::Error) -> Self {
    StampError::Io(err)
  }
}

impl From<String> for StampError {
  fn from(msg: String) -> Self {
    StampError::message(msg)
  }
}

impl From<&str> for StampError {
  fn from(msg: &str) -> Self {
    StampError::message(msg)
  }
}

impl From<serde_yaml::Error> for StampError {
  fn from(err: serde_yaml::Error) -> Self {
    StampError::message(format!("YAML error: {}", err))
  }
}

impl From<serde_json::Error> for StampError {
  fn from(err: serde_json::Error) -> Self {
    StampError::message(format!("JSON error: {}", err))
  }
}

impl From<std::string::FromUtf8Error> for StampError {
  fn from(err: std::string::FromUtf8Error) -> Self {
    StampError::message(format!("UTF-8 conversion error: {}", err))
  }
}

impl From<std::num::ParseIntError> for StampError {
  fn from(err: std::num::ParseIntError) -> Self {
    StampError::message(format!("Parse error: {}", err))
  }
}

/// Convert anyhow::Error to StampError (for transition period)
impl From<anyhow::Error> for StampError {
  fn from(err: anyhow::Error) -> Self {
    StampError::message(err.to_string())
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// chartstamp.yaml not found
  NotFound { root: PathBuf },

  /// chartstamp.yaml could not be parsed
  Invalid { path: PathBuf, reason: String },

  /// Missing required field
  MissingField { field: String },

  /// An image entry has no values paths to update
  EmptyValuesPath { image: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => Some(
        "Create a chartstamp.yaml at the repository root with a `charts:` list. See the README for the schema."
          .to_string(),
      ),
      ConfigError::EmptyValuesPath { image } => Some(format!(
        "Add at least one `valuesPath` entry for image '{}' in chartstamp.yaml",
        image
      )),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(
          f,
          "No chartstamp configuration found.\nExpected file: {}/chartstamp.yaml",
          root.display()
        )
      }
      ConfigError::Invalid { path, reason } => {
        write!(f, "Invalid configuration in {}: {}", path.display(), reason)
      }
      ConfigError::MissingField { field } => {
        write!(f, "Missing required field in config: {}", field)
      }
      ConfigError::EmptyValuesPath { image } => {
        write!(f, "Image '{}' has an empty valuesPath list", image)
      }
    }
  }
}

/// Git query errors
#[derive(Debug)]
pub enum GitError {
  /// Git command failed
  CommandFailed { command: String, stderr: String },

  /// Repository not found
  RepoNotFound { path: PathBuf },

  /// No commit in history touches the queried paths
  NoHistory { paths: Vec<String> },
}

impl GitError {
  fn help_message(&self) -> Option<String> {
    match self {
      GitError::RepoNotFound { path } => Some(format!(
        "Run chartstamp from inside a git repository, or check the path: {}",
        path.display()
      )),
      GitError::NoHistory { .. } => {
        Some("Commit the chart files first so a version can be derived from history.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for GitError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      GitError::CommandFailed { command, stderr } => {
        write!(f, "Git command failed: {}\n{}", command, stderr)
      }
      GitError::RepoNotFound { path } => {
        write!(f, "Git repository not found at: {}", path.display())
      }
      GitError::NoHistory { paths } => {
        write!(f, "No commits found touching paths: {}", paths.join(", "))
      }
    }
  }
}

/// Version derivation and validation errors
#[derive(Debug)]
pub enum VersionError {
  /// Base version is not valid SemVer 2
  InvalidBase { base: String, reason: String },

  /// A shorthand (major/minor/patch) was requested but the latest tag
  /// cannot be parsed as SemVer 2
  ShorthandTarget { shorthand: String, tag: String },

  /// Base version does not sort after the latest tag
  NotGreater { base: String, tag: String },

  /// A version failed strict SemVer 2 validation
  StrictFormat { version: String },
}

impl VersionError {
  fn help_message(&self) -> Option<String> {
    match self {
      VersionError::NotGreater { tag, .. } => Some(format!(
        "Update baseVersion in chartstamp.yaml to a version sorting after the latest tag '{}'",
        tag
      )),
      VersionError::StrictFormat { .. } => Some(
        "Chart versions must be SemVer 2 (major.minor.patch with optional prerelease), optionally prefixed with 'v'."
          .to_string(),
      ),
      VersionError::ShorthandTarget { tag, .. } => Some(format!(
        "Shorthands increment the latest tag, but '{}' is not SemVer 2. Configure a concrete baseVersion instead.",
        tag
      )),
      _ => None,
    }
  }
}

impl fmt::Display for VersionError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      VersionError::InvalidBase { base, reason } => {
        write!(f, "Invalid base version '{}': {}", base, reason)
      }
      VersionError::ShorthandTarget { shorthand, tag } => {
        write!(
          f,
          "Cannot auto-increment '{}': latest tag '{}' is not a valid SemVer 2 version",
          shorthand, tag
        )
      }
      VersionError::NotGreater { base, tag } => {
        write!(f, "Base version '{}' is not greater than latest tag '{}'", base, tag)
      }
      VersionError::StrictFormat { version } => {
        write!(f, "Version '{}' is not a valid SemVer 2 version", version)
      }
    }
  }
}

/// Value-tree patching errors
#[derive(Debug)]
pub enum ValuesError {
  /// A path segment could not be resolved while descending the document
  PathNotFound { path: String, segment: String, file: PathBuf },

  /// The terminal node is neither a recognized mapping nor a scalar string
  UnsupportedNode { path: String, kind: String, file: PathBuf },

  /// A mapping node has neither a `name` nor a `repository` key
  MissingRepositoryKey { path: String, file: PathBuf },

  /// A mapping node has both `name` and `repository` keys
  AmbiguousRepositoryKey { path: String, file: PathBuf },
}

impl ValuesError {
  fn help_message(&self) -> Option<String> {
    match self {
      ValuesError::PathNotFound { .. } => {
        Some("Check the valuesPath entries in chartstamp.yaml against the values.yaml structure.".to_string())
      }
      ValuesError::MissingRepositoryKey { .. } => {
        Some("Image mappings must carry a 'name' or 'repository' key for chartstamp to update.".to_string())
      }
      ValuesError::AmbiguousRepositoryKey { .. } => {
        Some("Keep either 'name' or 'repository' on the image mapping, not both.".to_string())
      }
      _ => None,
    }
  }
}

impl fmt::Display for ValuesError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ValuesError::PathNotFound { path, segment, file } => {
        write!(
          f,
          "Could not resolve '{}' in {}: segment '{}' not found",
          path,
          file.display(),
          segment
        )
      }
      ValuesError::UnsupportedNode { path, kind, file } => {
        write!(
          f,
          "The value at '{}' in {} must be a mapping or string, not {}",
          path,
          file.display(),
          kind
        )
      }
      ValuesError::MissingRepositoryKey { path, file } => {
        write!(f, "Could not find 'name' or 'repository' in {}:{}", file.display(), path)
      }
      ValuesError::AmbiguousRepositoryKey { path, file } => {
        write!(
          f,
          "Found both 'name' and 'repository' in {}:{}; expected exactly one",
          file.display(),
          path
        )
      }
    }
  }
}

/// Result type alias for chartstamp
pub type StampResult<T> = Result<T, StampError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context to an error result
  fn context(self, ctx: impl Into<String>) -> StampResult<T>;

  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> StampResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<StampError>,
{
  fn context(self, ctx: impl Into<String>) -> StampResult<T> {
    self.map_err(|e| e.into().context(ctx))
  }

  fn with_context<F>(self, f: F) -> StampResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &StampError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
