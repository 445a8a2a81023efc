use clap::Args;
use clap::Subcommand;

use super::DatabaseConfig;
use crate::db;
use crate::models::User;

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// Provision a user that the authentication gateway may forward
    Create(CreateUserArgs),
}

#[derive(Args, Debug)]
pub struct CreateUserArgs {
    /// Email the gateway reports as the user's identity
    email: String,
    /// Display name
    #[arg(default_value = "")]
    name: String,
}

pub async fn create_user(
    CreateUserArgs { email, name }: CreateUserArgs,
    database_config: DatabaseConfig,
) -> anyhow::Result<()> {
    let pool = db::connect(&database_config.database_url, database_config.pool_size).await?;
    let user = User::create(&pool, &email, &name).await?;
    println!("created user '{}' with id {}", user.email, user.id);
    Ok(())
}
