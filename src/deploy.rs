//! Migration deployment check.
//!
//! Validates the migration files an operator is about to paste into the
//! Supabase SQL editor. Nothing is executed remotely: the REST surface has no
//! arbitrary-SQL endpoint, so the run ends with manual instructions.

use std::io::Write;
use std::path::{Path, PathBuf};

use crate::config::DeployConfig;
use crate::console;
use crate::credential::Credential;
use crate::error::DeployError;
use crate::migration::MigrationFile;

pub struct Deployer {
  config: DeployConfig,
  project_root: PathBuf,
}

impl Deployer {
  pub fn new(config: DeployConfig, project_root: impl Into<PathBuf>) -> Self {
    Self {
      config,
      project_root: project_root.into(),
    }
  }

  pub fn migrations_dir(&self) -> PathBuf {
    self.config.migrations_dir(&self.project_root)
  }

  /// Checks the credential, then loads each migration in order, stopping at
  /// the first one that is missing or unreadable. Failures are written to
  /// `out` before being returned.
  pub fn run(
    &self,
    credential: Option<&Credential>,
    out: &mut dyn Write,
  ) -> Result<Vec<MigrationFile>, DeployError> {
    if credential.is_none() {
      tracing::warn!(var = %self.config.credential_var, "service credential missing");
      console::write_missing_credential(out, &self.config)?;
      return Err(DeployError::MissingCredential {
        var: self.config.credential_var.clone(),
      });
    }

    console::write_banner(out, &self.config)?;

    let dir = self.migrations_dir();
    tracing::debug!(dir = %dir.display(), count = self.config.migrations.len(), "validating migrations");

    let mut loaded = Vec::with_capacity(self.config.migrations.len());
    for name in &self.config.migrations {
      let file = self.process(&dir, name, out)?;
      loaded.push(file);
    }

    console::write_completion(out, &self.config)?;
    tracing::info!(count = loaded.len(), "all migration files validated");
    Ok(loaded)
  }

  fn process(
    &self,
    dir: &Path,
    name: &str,
    out: &mut dyn Write,
  ) -> Result<MigrationFile, DeployError> {
    console::write_deploying(out, name)?;
    match MigrationFile::load(dir, name) {
      Ok(file) => {
        console::write_loaded(out, &file)?;
        Ok(file)
      }
      Err(err) => {
        tracing::warn!(migration = name, error = %err, "stopping at failed migration");
        console::write_failure(out, &err)?;
        Err(err)
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;
  use crate::config::MIGRATIONS;

  fn project(files: &[(&str, &str)]) -> tempfile::TempDir {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("supabase").join("migrations");
    fs::create_dir_all(&dir).unwrap();
    for (name, body) in files {
      fs::write(dir.join(name), body).unwrap();
    }
    tmp
  }

  fn credential() -> Credential {
    Credential::new("service-role-key").unwrap()
  }

  fn run(root: &Path, credential: Option<&Credential>) -> (Result<Vec<MigrationFile>, DeployError>, String) {
    let deployer = Deployer::new(DeployConfig::default(), root);
    let mut out = Vec::new();
    let result = deployer.run(credential, &mut out);
    (result, String::from_utf8(out).unwrap())
  }

  #[test]
  fn missing_credential_stops_before_file_checks() {
    let tmp = tempfile::tempdir().unwrap();
    let (result, text) = run(tmp.path(), None);

    let err = result.unwrap_err();
    assert!(matches!(err, DeployError::MissingCredential { .. }));
    assert_eq!(err.exit_code(), 1);
    assert!(text.contains("Get your service role key from:"));
    assert!(!text.contains("Deploying"));
    assert!(!text.contains("not found"));
  }

  #[test]
  fn all_present_reports_counts_in_order() {
    let tmp = project(&[
      (MIGRATIONS[0], "create table a ();\ncreate table b ();\n"),
      (MIGRATIONS[1], "alter table a enable row level security;\n"),
      (MIGRATIONS[2], "l1\nl2\nl3\nl4\nl5"),
    ]);
    let cred = credential();
    let (result, text) = run(tmp.path(), Some(&cred));

    let files = result.unwrap();
    let counts: Vec<_> = files.iter().map(|f| (f.name.as_str(), f.line_count)).collect();
    assert_eq!(
      counts,
      vec![(MIGRATIONS[0], 2), (MIGRATIONS[1], 1), (MIGRATIONS[2], 5)]
    );

    let first = text.find("Deploying 001_initial_schema.sql").unwrap();
    let second = text.find("Deploying 002_rls_policies.sql").unwrap();
    let third = text.find("Deploying 003_functions_triggers.sql").unwrap();
    assert!(first < second && second < third);
    assert_eq!(text.matches("   Lines: ").count(), 3);
    assert!(text.contains("   Lines: 5"));
    assert!(text.contains("All migration files validated!"));
  }

  #[test]
  fn missing_second_file_stops_the_run() {
    let tmp = project(&[
      (MIGRATIONS[0], "select 1;\n"),
      (MIGRATIONS[2], "select 3;\n"),
    ]);
    let cred = credential();
    let (result, text) = run(tmp.path(), Some(&cred));

    let err = result.unwrap_err();
    assert_eq!(err.migration(), Some(MIGRATIONS[1]));
    assert!(text.contains("Migration file not found:"));
    assert!(text.contains("002_rls_policies.sql"));
    assert!(!text.contains("003_functions_triggers.sql"));
    assert!(!text.contains("All migration files validated!"));
    assert_eq!(text.matches("   Lines: ").count(), 1);
  }

  #[test]
  fn custom_list_is_respected() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path().join("db");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("010_only.sql"), "a\nb\nc\n").unwrap();

    let config = DeployConfig {
      migrations_dir: "db".into(),
      migrations: vec!["010_only.sql".to_string()],
      ..DeployConfig::default()
    };
    let deployer = Deployer::new(config, tmp.path());
    let mut out = Vec::new();
    let files = deployer.run(Some(&credential()), &mut out).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].line_count, 3);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Execute in order (010)"));
  }

  #[test]
  fn files_are_left_untouched() {
    let body = "create table t ();\n";
    let tmp = project(&[
      (MIGRATIONS[0], body),
      (MIGRATIONS[1], body),
      (MIGRATIONS[2], body),
    ]);
    let cred = credential();
    let (result, _) = run(tmp.path(), Some(&cred));
    assert!(result.is_ok());

    let dir = tmp.path().join("supabase").join("migrations");
    for name in MIGRATIONS {
      assert_eq!(fs::read_to_string(dir.join(name)).unwrap(), body);
    }
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 3);
  }
}
