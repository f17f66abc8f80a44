use std::str::FromStr;
use std::time::Duration;

use sqlx::pool::PoolOptions;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Pool, Sqlite};

use crate::settings::Config;

pub async fn init_pool(config: &Config) -> Pool<Sqlite> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .expect("Invalid database url")
        .create_if_missing(true)
        .foreign_keys(true);
    PoolOptions::new()
        .max_connections(5)
        .idle_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .expect("Failed to connect to database")
}
