//! Grant ledger.
//!
//! Append-oriented audit trail of grant and revocation events. The store
//! enforces at most one active row per (user, permission) pair through a
//! partial unique index; a lost insert race is recovered here by returning
//! the winning row instead of surfacing the conflict.

use chrono::Utc;
use sqlx::{Sqlite, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    model::{permission::Permission, user::User, user_permission::UserPermission},
    repository,
};

#[cfg(test)]
mod ledger_test;

/// Issue a grant. Idempotent: an existing active grant is returned unchanged.
/// A previously revoked pair keeps its revocation rows for audit and gets a
/// fresh active row (the un-revoke path that restores a power user's default
/// access).
pub async fn grant(
    tx: &mut Transaction<'_, Sqlite>,
    user: &User,
    permission: &Permission,
    granted_by: Option<&User>,
    notes: Option<String>,
) -> anyhow::Result<UserPermission> {
    if let Some(existing) =
        repository::user_permission::get_active_grant(tx, &user.id, &permission.id).await?
    {
        debug!(
            user = %user.email,
            codename = %permission.codename,
            "grant already active, returning existing row"
        );
        return Ok(existing);
    }

    let grant = UserPermission {
        id: Uuid::now_v7(),
        user_id: user.id,
        permission_id: permission.id,
        granted_by: granted_by.map(|u| u.id),
        granted_at: Utc::now(),
        revoked_by: None,
        revoked_at: None,
        is_active: true,
        notes,
    };
    match repository::user_permission::create_grant(tx, &grant).await {
        Ok(()) => {
            info!(user = %user.email, codename = %permission.codename, "granted permission");
            Ok(grant)
        }
        Err(err) if is_unique_violation(&err) => {
            // Lost the insert race on the active-grant index: treat as
            // "grant already exists" and return the winner's row.
            let existing =
                repository::user_permission::get_active_grant(tx, &user.id, &permission.id)
                    .await?;
            existing.ok_or(err)
        }
        Err(err) => Err(err),
    }
}

/// Revoke a permission. For a regular actor the active grant is flipped in
/// place and stamped; with no active grant this is a no-op returning `None`.
/// For a power user absence of rows already means "granted", so revocation
/// instead records an inactive suppression row for the pair.
pub async fn revoke(
    tx: &mut Transaction<'_, Sqlite>,
    user: &User,
    permission: &Permission,
    revoked_by: Option<&User>,
) -> anyhow::Result<Option<UserPermission>> {
    if let Some(mut active) =
        repository::user_permission::get_active_grant(tx, &user.id, &permission.id).await?
    {
        active.is_active = false;
        active.revoked_by = revoked_by.map(|u| u.id);
        active.revoked_at = Some(Utc::now());
        repository::user_permission::update_grant(tx, &active).await?;
        info!(user = %user.email, codename = %permission.codename, "revoked permission");
        return Ok(Some(active));
    }

    if user.is_power_user {
        // Get-or-create the suppression marker, forced inactive.
        if let Some(existing) =
            repository::user_permission::get_latest_inactive_grant(tx, &user.id, &permission.id)
                .await?
        {
            return Ok(Some(existing));
        }
        let now = Utc::now();
        let suppression = UserPermission {
            id: Uuid::now_v7(),
            user_id: user.id,
            permission_id: permission.id,
            granted_by: None,
            granted_at: now,
            revoked_by: revoked_by.map(|u| u.id),
            revoked_at: Some(now),
            is_active: false,
            notes: None,
        };
        repository::user_permission::create_grant(tx, &suppression).await?;
        info!(
            user = %user.email,
            codename = %permission.codename,
            "suppressed power-user default access"
        );
        return Ok(Some(suppression));
    }

    Ok(None)
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .is_some_and(|db| db.is_unique_violation())
}
