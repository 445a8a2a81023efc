use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct DatabaseConfig {
    /// Database url like `sqlite://notepad.db` (the file is created if missing)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://notepad.db")]
    pub database_url: String,
    #[arg(long, env = "NOTEPAD_POOL_SIZE", default_value_t = 8)]
    pub pool_size: u32,
}
