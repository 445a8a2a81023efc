mod client;
mod db;
mod error;
mod models;
mod views;

use clap::Parser;
use client::Client;
use client::Commands;
use client::user::UserCommand;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::parse();
    init_tracing();

    let Client {
        database_config,
        app_version,
        command,
    } = client;
    match command {
        Commands::Runserver(args) => {
            client::runserver::runserver(args, database_config, app_version).await
        }
        Commands::Healthcheck => client::healthcheck::healthcheck(database_config).await,
        Commands::User(UserCommand::Create(args)) => {
            client::user::create_user(args, database_config).await
        }
    }
}

fn init_tracing() {
    let env_filter_layer = tracing_subscriber::EnvFilter::builder()
        // Set the default log level to 'info'
        .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter_layer)
        .init();
}
