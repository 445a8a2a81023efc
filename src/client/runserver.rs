use clap::Args;

use super::DatabaseConfig;
use crate::views;
use crate::views::ServerConfig;

#[derive(Args, Debug)]
#[command(about, long_about = "Launch the server")]
pub struct RunserverArgs {
    #[arg(long, env = "NOTEPAD_PORT", default_value_t = 8090)]
    port: u16,
    #[arg(long, env = "NOTEPAD_ADDRESS", default_value_t = String::from("0.0.0.0"))]
    address: String,
}

/// Create and run the server
pub async fn runserver(
    RunserverArgs { port, address }: RunserverArgs,
    database_config: DatabaseConfig,
    app_version: Option<String>,
) -> anyhow::Result<()> {
    let config = ServerConfig {
        port,
        address,
        database_url: database_config.database_url,
        pool_size: database_config.pool_size,
        app_version,
    };
    let server = views::Server::new(config).await?;
    server.start().await?;
    Ok(())
}
