use sqlx::migrate::Migrator;
use sqlx::SqlitePool;

pub static MIGRATOR: Migrator = sqlx::migrate!();

pub async fn db_migrate(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR.run(pool).await?;
    println!("migrations applied");
    Ok(())
}

pub async fn db_revert(pool: &SqlitePool) -> anyhow::Result<()> {
    MIGRATOR.undo(pool, 0).await?;
    println!("migrations reverted");
    Ok(())
}
