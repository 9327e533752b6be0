pub mod api;
pub mod config;
pub mod console;
pub mod credential;
pub mod deploy;
pub mod error;
pub mod migration;

pub use config::{DeployConfig, read_config};
pub use credential::Credential;
pub use deploy::Deployer;
pub use error::DeployError;
pub use migration::{MigrationFile, line_count};
