mod database_config;
pub mod healthcheck;
pub mod runserver;
pub mod user;

use clap::Parser;
use clap::Subcommand;

pub use database_config::DatabaseConfig;
use runserver::RunserverArgs;
use user::UserCommand;

#[derive(Parser, Debug)]
#[command(author, version)]
pub struct Client {
    #[command(flatten)]
    pub database_config: DatabaseConfig,
    /// Service version reported by `/version` (always provide in production)
    #[clap(long, env = "NOTEPAD_GIT_DESCRIBE")]
    pub app_version: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Runserver(RunserverArgs),
    #[command(about, long_about = "Checks that the database is reachable")]
    Healthcheck,
    #[command(subcommand, about, long_about = "User related commands")]
    User(UserCommand),
}
