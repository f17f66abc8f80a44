use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::catalog::{self, RegisterSummary};
use crate::model::user::{Role, User};
use crate::repository;

/// Insert an actor row for tests and CLI smoke checks.
pub async fn create_test_user(
    pool: &SqlitePool,
    email: &str,
    role: Option<Role>,
    is_power_user: bool,
    is_superuser: bool,
) -> anyhow::Result<User> {
    let now = Utc::now();
    let user = User {
        id: Uuid::now_v7(),
        email: email.to_string(),
        user_type: role,
        is_power_user,
        is_superuser,
        is_active: true,
        created_date: now,
        updated_date: now,
    };
    let mut tx = pool.begin().await?;
    repository::user::create_user(&mut tx, &user).await?;
    tx.commit().await?;
    Ok(user)
}

/// Register the builtin permission definitions.
pub async fn seed_catalog(pool: &SqlitePool) -> anyhow::Result<RegisterSummary> {
    let mut tx = pool.begin().await?;
    let summary = catalog::register(&mut tx, &catalog::builtin_definitions()).await?;
    tx.commit().await?;
    Ok(summary)
}
