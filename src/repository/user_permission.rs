use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::model::{
    permission::Permission,
    user_permission::{UserPermission, TABLE_NAME},
};

pub async fn get_active_grant(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &Uuid,
    permission_id: &Uuid,
) -> anyhow::Result<Option<UserPermission>> {
    Ok(sqlx::query_as(
        format!(
            "SELECT * FROM {} WHERE user_id = ? AND permission_id = ? AND is_active = TRUE",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .bind(permission_id)
    .fetch_optional(&mut **tx)
    .await?)
}

/// Latest revoked row for the pair, if any. For a power user this is the
/// suppression marker that overrides their default access.
pub async fn get_latest_inactive_grant(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &Uuid,
    permission_id: &Uuid,
) -> anyhow::Result<Option<UserPermission>> {
    Ok(sqlx::query_as(
        format!(
            "SELECT * FROM {} WHERE user_id = ? AND permission_id = ? AND is_active = FALSE
            ORDER BY granted_at DESC LIMIT 1",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .bind(permission_id)
    .fetch_optional(&mut **tx)
    .await?)
}

pub async fn get_grants_for_pair(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &Uuid,
    permission_id: &Uuid,
) -> anyhow::Result<Vec<UserPermission>> {
    Ok(sqlx::query_as(
        format!(
            "SELECT * FROM {} WHERE user_id = ? AND permission_id = ?
            ORDER BY granted_at DESC",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .bind(permission_id)
    .fetch_all(&mut **tx)
    .await?)
}

pub async fn count_active_grants(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &Uuid,
    permission_id: &Uuid,
) -> anyhow::Result<i64> {
    let count: (i64,) = sqlx::query_as(
        format!(
            "SELECT count(id) FROM {} WHERE user_id = ? AND permission_id = ? AND is_active = TRUE",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .bind(permission_id)
    .fetch_one(&mut **tx)
    .await?;
    Ok(count.0)
}

pub async fn create_grant(
    tx: &mut Transaction<'_, Sqlite>,
    grant: &UserPermission,
) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            "INSERT INTO {} (id, user_id, permission_id, granted_by, granted_at,
        revoked_by, revoked_at, is_active, notes)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(grant.id)
    .bind(grant.user_id)
    .bind(grant.permission_id)
    .bind(grant.granted_by)
    .bind(grant.granted_at)
    .bind(grant.revoked_by)
    .bind(grant.revoked_at)
    .bind(grant.is_active)
    .bind(&grant.notes)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn update_grant(
    tx: &mut Transaction<'_, Sqlite>,
    grant: &UserPermission,
) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            "UPDATE {}
        SET granted_by = ?, granted_at = ?, revoked_by = ?, revoked_at = ?,
        is_active = ?, notes = ?
        WHERE id = ?",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(grant.granted_by)
    .bind(grant.granted_at)
    .bind(grant.revoked_by)
    .bind(grant.revoked_at)
    .bind(grant.is_active)
    .bind(&grant.notes)
    .bind(grant.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Active permissions held through explicit grants (the regular-actor view).
pub async fn list_granted_permissions(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &Uuid,
) -> anyhow::Result<Vec<Permission>> {
    Ok(sqlx::query_as(
        format!(
            "SELECT p.* FROM permission p
            JOIN {} up ON up.permission_id = p.id
            WHERE up.user_id = ? AND up.is_active = TRUE AND p.is_active = TRUE
            ORDER BY p.category ASC, p.priority ASC, p.name ASC",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?)
}

/// All active permissions except those explicitly revoked for this user (the
/// power-user view). A pair that was revoked and later re-granted keeps its
/// old revocation rows for audit, so an active grant overrides them here.
pub async fn list_default_permissions(
    tx: &mut Transaction<'_, Sqlite>,
    user_id: &Uuid,
) -> anyhow::Result<Vec<Permission>> {
    Ok(sqlx::query_as(
        format!(
            "SELECT p.* FROM permission p
            WHERE p.is_active = TRUE
            AND (
                EXISTS (
                    SELECT 1 FROM {table} up
                    WHERE up.user_id = ? AND up.permission_id = p.id AND up.is_active = TRUE
                )
                OR NOT EXISTS (
                    SELECT 1 FROM {table} up
                    WHERE up.user_id = ? AND up.permission_id = p.id AND up.is_active = FALSE
                )
            )
            ORDER BY p.category ASC, p.priority ASC, p.name ASC",
            table = TABLE_NAME
        )
        .as_str(),
    )
    .bind(user_id)
    .bind(user_id)
    .fetch_all(&mut **tx)
    .await?)
}
