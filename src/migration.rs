use std::fs;
use std::path::{Path, PathBuf};

use crate::error::DeployError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationFile {
  pub name: String,
  pub path: PathBuf,
  pub content: String,
  pub line_count: usize,
}

impl MigrationFile {
  /// Reads `dir/name`. Missing files and unreadable files are reported separately.
  pub fn load(dir: &Path, name: &str) -> Result<Self, DeployError> {
    let path = absolute(&dir.join(name));
    if !path.exists() {
      return Err(DeployError::MissingMigration {
        name: name.to_string(),
        path,
      });
    }
    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(source) => {
        return Err(DeployError::UnreadableMigration {
          name: name.to_string(),
          path,
          source,
        });
      }
    };
    let line_count = line_count(&content);
    tracing::debug!(migration = name, path = %path.display(), line_count, "migration loaded");
    Ok(Self {
      name: name.to_string(),
      path,
      content,
      line_count,
    })
  }
}

/// Number of newline-delimited lines. A trailing newline does not start a new line.
pub fn line_count(content: &str) -> usize {
  content.lines().count()
}

fn absolute(path: &Path) -> PathBuf {
  std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
