use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
  #[error("{var} environment variable not set")]
  MissingCredential { var: String },

  #[error("Migration file not found: {}", path.display())]
  MissingMigration { name: String, path: PathBuf },

  #[error("Migration file could not be read: {}: {source}", path.display())]
  UnreadableMigration {
    name: String,
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Configuration error: {0}")]
  Config(String),

  #[error("Failed to write output: {0}")]
  Output(#[from] io::Error),
}

impl DeployError {
  pub fn exit_code(&self) -> u8 {
    1
  }

  /// Migration the run stopped at, if the failure belongs to one.
  pub fn migration(&self) -> Option<&str> {
    match self {
      DeployError::MissingMigration { name, .. } | DeployError::UnreadableMigration { name, .. } => {
        Some(name.as_str())
      }
      _ => None,
    }
  }
}
