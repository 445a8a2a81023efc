use anyhow::Context as _;

use super::DatabaseConfig;
use crate::db;

pub async fn healthcheck(database_config: DatabaseConfig) -> anyhow::Result<()> {
    let pool = db::connect(&database_config.database_url, database_config.pool_size)
        .await
        .context("failed to connect to the database")?;
    db::ping(&pool)
        .await
        .context("database did not answer the ping")?;
    println!("the database is up");
    Ok(())
}
