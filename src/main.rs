use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use supernetwork_deploy::{Credential, DeployConfig, DeployError, Deployer, read_config};

#[derive(Parser)]
#[command(name = "deploy-migrations")]
#[command(version, about = "Validate SuperNetworkAI Supabase migrations before applying them in the SQL editor")]
struct Cli {
  /// Directory containing supabase/migrations (defaults to the current directory)
  #[arg(long, value_name = "DIR")]
  project_root: Option<PathBuf>,

  /// JSON file overriding project ref, migrations directory or file list
  #[arg(long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Log diagnostics to stderr
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();
  dotenvy::dotenv().ok();
  init_tracing(cli.verbose);

  let stdout = io::stdout();
  let mut out = stdout.lock();
  let code = match run(&cli, &mut out) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      if matches!(err, DeployError::Config(_) | DeployError::Output(_)) {
        eprintln!("❌ {err}");
      }
      ExitCode::from(err.exit_code())
    }
  };
  let _ = out.flush();
  code
}

fn run(cli: &Cli, out: &mut dyn Write) -> Result<(), DeployError> {
  let config = match &cli.config {
    Some(path) => read_config(path)?,
    None => DeployConfig::default(),
  };
  let project_root = match &cli.project_root {
    Some(root) => root.clone(),
    None => std::env::current_dir()
      .map_err(|e| DeployError::Config(format!("cannot resolve working directory: {e}")))?,
  };
  tracing::debug!(
    project_ref = %config.project_ref,
    project_root = %project_root.display(),
    "configuration loaded"
  );

  let credential = Credential::from_env(&config.credential_var);
  let deployer = Deployer::new(config, project_root);
  deployer.run(credential.as_ref(), out)?;
  Ok(())
}

fn init_tracing(verbose: bool) {
  let default_filter = if verbose {
    "warn,supernetwork_deploy=debug,deploy_migrations=debug"
  } else {
    "warn"
  };
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
    )
    .with_writer(io::stderr)
    .init();
}
