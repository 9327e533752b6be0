use std::io::{self, Write};

use crate::config::DeployConfig;
use crate::error::DeployError;
use crate::migration::MigrationFile;

const RULE_WIDTH: usize = 50;

fn rule() -> String {
  "=".repeat(RULE_WIDTH)
}

pub fn write_missing_credential(out: &mut dyn Write, config: &DeployConfig) -> io::Result<()> {
  let var = &config.credential_var;
  writeln!(out, "❌ {var} environment variable not set")?;
  writeln!(out)?;
  writeln!(out, "Get your service role key from:")?;
  writeln!(out, "{}", config.api_settings_url())?;
  writeln!(out)?;
  writeln!(out, "Then run:")?;
  writeln!(out, "export {var}='your-service-role-key'  # Linux/Mac")?;
  writeln!(out, "set {var}=your-service-role-key      # Windows")?;
  Ok(())
}

pub fn write_banner(out: &mut dyn Write, config: &DeployConfig) -> io::Result<()> {
  writeln!(out, "🚀 {} - Database Migration Deployment", config.project_name)?;
  writeln!(out, "{}", rule())?;
  writeln!(out)?;
  writeln!(out, "⚠️  IMPORTANT: This tool requires direct database access")?;
  writeln!(out, "The Supabase REST API doesn't support arbitrary SQL execution.")?;
  writeln!(out)?;
  writeln!(out, "RECOMMENDED APPROACH:")?;
  writeln!(out, "1. Open Supabase SQL Editor:")?;
  writeln!(out, "   {}", config.sql_editor_url())?;
  writeln!(out, "2. Copy-paste each migration file")?;
  writeln!(out, "3. Execute in order ({})", config.order_hint())?;
  writeln!(out)?;
  writeln!(out, "{}", rule())?;
  Ok(())
}

pub fn write_deploying(out: &mut dyn Write, name: &str) -> io::Result<()> {
  writeln!(out)?;
  writeln!(out, "📦 Deploying {name}...")
}

pub fn write_loaded(out: &mut dyn Write, file: &MigrationFile) -> io::Result<()> {
  writeln!(out, "⚠️  Direct SQL execution via REST API is not available")?;
  writeln!(out, "📋 SQL content loaded successfully")?;
  writeln!(out, "   Lines: {}", file.line_count)
}

pub fn write_failure(out: &mut dyn Write, err: &DeployError) -> io::Result<()> {
  writeln!(out, "❌ {err}")?;
  if let Some(name) = err.migration() {
    writeln!(out)?;
    writeln!(out, "❌ Failed to process {name}")?;
  }
  Ok(())
}

pub fn write_completion(out: &mut dyn Write, config: &DeployConfig) -> io::Result<()> {
  writeln!(out)?;
  writeln!(out, "✅ All migration files validated!")?;
  writeln!(out)?;
  writeln!(out, "Next: Execute them in Supabase SQL Editor")?;
  writeln!(out, "   {}", config.sql_editor_url())?;
  writeln!(out, "   Run in order: {}", config.migrations.join(", "))
}
