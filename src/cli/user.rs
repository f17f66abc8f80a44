use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    model::user::{Role, User},
    repository,
};

pub async fn create_user(
    pool: &SqlitePool,
    email: &str,
    role: Option<Role>,
    is_power_user: bool,
    is_superuser: bool,
) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
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
    repository::user::create_user(&mut tx, &user).await?;
    tx.commit().await?;
    println!("created user {} ({})", user.email, user.id);
    Ok(())
}
