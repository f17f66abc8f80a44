use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::model::user::{User, TABLE_NAME};

pub async fn get_user_by_id(
    tx: &mut Transaction<'_, Sqlite>,
    id: &Uuid,
) -> anyhow::Result<Option<User>> {
    Ok(
        sqlx::query_as(format!("SELECT * FROM {} WHERE id = ?", TABLE_NAME).as_str())
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?,
    )
}

pub async fn get_user_by_email(
    tx: &mut Transaction<'_, Sqlite>,
    email: &str,
) -> anyhow::Result<Option<User>> {
    Ok(
        sqlx::query_as(format!("SELECT * FROM {} WHERE email = ?", TABLE_NAME).as_str())
            .bind(email)
            .fetch_optional(&mut **tx)
            .await?,
    )
}

pub async fn create_user(tx: &mut Transaction<'_, Sqlite>, user: &User) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            "INSERT INTO {} (id, email, user_type, is_power_user, is_superuser,
        is_active, created_date, updated_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(user.user_type)
    .bind(user.is_power_user)
    .bind(user.is_superuser)
    .bind(user.is_active)
    .bind(user.created_date)
    .bind(user.updated_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
