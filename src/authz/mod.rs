//! Authorization engine.
//!
//! Regular actors hold nothing unless explicitly granted; power users hold
//! every active permission unless explicitly revoked. The two defaults are
//! deliberately kept in separate resolver functions so the asymmetry stays
//! auditable.

use sqlx::{Sqlite, Transaction};

use crate::{
    catalog::codenames,
    model::{permission::Permission, user::User},
    repository,
};

#[cfg(test)]
mod authz_test;

/// Resolve whether `actor` holds the permission named `codename`.
///
/// Fails closed: a missing or inactive actor, an unknown codename, or a
/// soft-deleted permission all resolve to `false`. Only storage failures
/// surface as errors.
pub async fn has_permission(
    tx: &mut Transaction<'_, Sqlite>,
    actor: Option<&User>,
    codename: &str,
) -> anyhow::Result<bool> {
    let Some(user) = actor else {
        return Ok(false);
    };
    if !user.is_active {
        return Ok(false);
    }
    if user.is_superuser {
        return Ok(true);
    }
    if user.is_power_user {
        resolve_power_user(tx, user, codename).await
    } else {
        resolve_regular(tx, user, codename).await
    }
}

/// Opt-in default: an explicit active grant against an active permission.
async fn resolve_regular(
    tx: &mut Transaction<'_, Sqlite>,
    user: &User,
    codename: &str,
) -> anyhow::Result<bool> {
    let Some(permission) = repository::permission::get_permission_by_codename(tx, codename).await?
    else {
        return Ok(false);
    };
    if !permission.is_active {
        return Ok(false);
    }
    let grant = repository::user_permission::get_active_grant(tx, &user.id, &permission.id).await?;
    Ok(grant.is_some())
}

/// Opt-out default: held unless a revocation row suppresses it. An active
/// grant overrides older revocation rows, so a revoked-then-regranted pair
/// resolves granted while its audit history stays in place.
async fn resolve_power_user(
    tx: &mut Transaction<'_, Sqlite>,
    user: &User,
    codename: &str,
) -> anyhow::Result<bool> {
    let Some(permission) = repository::permission::get_permission_by_codename(tx, codename).await?
    else {
        // A power user cannot hold a nonexistent permission.
        return Ok(false);
    };
    if !permission.is_active {
        return Ok(false);
    }
    if repository::user_permission::get_active_grant(tx, &user.id, &permission.id)
        .await?
        .is_some()
    {
        return Ok(true);
    }
    let revoked =
        repository::user_permission::get_latest_inactive_grant(tx, &user.id, &permission.id)
            .await?;
    Ok(revoked.is_none())
}

/// Every active permission the actor currently holds, ordered by category,
/// priority, name.
pub async fn all_active_permissions(
    tx: &mut Transaction<'_, Sqlite>,
    actor: &User,
) -> anyhow::Result<Vec<Permission>> {
    if !actor.is_active {
        return Ok(vec![]);
    }
    if actor.is_superuser {
        return repository::permission::get_all_active_permissions(tx).await;
    }
    if actor.is_power_user {
        repository::user_permission::list_default_permissions(tx, &actor.id).await
    } else {
        repository::user_permission::list_granted_permissions(tx, &actor.id).await
    }
}

/// Whether the actor may grant permissions to others: power user holding
/// `manage_user_permissions`.
pub async fn can_grant_permissions(
    tx: &mut Transaction<'_, Sqlite>,
    actor: &User,
) -> anyhow::Result<bool> {
    if !actor.is_power_user {
        return Ok(false);
    }
    has_permission(tx, Some(actor), codenames::MANAGE_USER_PERMISSIONS).await
}
