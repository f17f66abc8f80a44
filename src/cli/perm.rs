use anyhow::Context;
use sqlx::SqlitePool;

use crate::{
    authz, catalog,
    core::utils::{datetime_to_string, datetime_to_string_opt},
    model::{permission::Category, user::User},
    repository,
};

async fn require_user(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    email: &str,
) -> anyhow::Result<User> {
    repository::user::get_user_by_email(tx, email)
        .await?
        .with_context(|| format!("user not found: {email}"))
}

pub async fn register(pool: &SqlitePool) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
    let summary = catalog::register(&mut tx, &catalog::builtin_definitions()).await?;
    tx.commit().await?;
    println!(
        "Completed! Created: {}, Updated: {}, Skipped: {}",
        summary.created, summary.updated, summary.skipped
    );
    Ok(())
}

pub async fn grant(
    pool: &SqlitePool,
    email: &str,
    codename: &str,
    by: Option<&str>,
    notes: Option<String>,
) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
    let user = require_user(&mut tx, email).await?;
    let permission = repository::permission::get_permission_by_codename(&mut tx, codename)
        .await?
        .with_context(|| format!("permission not found: {codename}"))?;
    let granted_by = match by {
        Some(by_email) => Some(require_user(&mut tx, by_email).await?),
        None => None,
    };
    let grant =
        crate::ledger::grant(&mut tx, &user, &permission, granted_by.as_ref(), notes).await?;
    tx.commit().await?;
    println!(
        "granted {} to {} at {}",
        permission.codename,
        user.email,
        datetime_to_string(grant.granted_at)
    );
    Ok(())
}

pub async fn revoke(
    pool: &SqlitePool,
    email: &str,
    codename: &str,
    by: Option<&str>,
) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
    let user = require_user(&mut tx, email).await?;
    let permission = repository::permission::get_permission_by_codename(&mut tx, codename)
        .await?
        .with_context(|| format!("permission not found: {codename}"))?;
    let revoked_by = match by {
        Some(by_email) => Some(require_user(&mut tx, by_email).await?),
        None => None,
    };
    let revoked = crate::ledger::revoke(&mut tx, &user, &permission, revoked_by.as_ref()).await?;
    tx.commit().await?;
    match revoked {
        Some(row) => println!(
            "revoked {} from {} at {}",
            permission.codename,
            user.email,
            datetime_to_string_opt(row.revoked_at).unwrap_or_default()
        ),
        None => println!("{} holds no active grant for {}", user.email, permission.codename),
    }
    Ok(())
}

pub async fn check(pool: &SqlitePool, email: &str, codename: &str) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
    let user = require_user(&mut tx, email).await?;
    let allowed = authz::has_permission(&mut tx, Some(&user), codename).await?;
    tx.commit().await?;
    println!("{}: {} = {}", user.email, codename, allowed);
    Ok(())
}

pub async fn list(pool: &SqlitePool, email: &str) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
    let user = require_user(&mut tx, email).await?;
    let permissions = authz::all_active_permissions(&mut tx, &user).await?;
    tx.commit().await?;
    println!("{} holds {} permission(s)", user.email, permissions.len());
    for permission in permissions {
        println!(
            "  {} ({}) [{}]",
            permission.codename,
            permission.name,
            permission
                .category
                .map(|c| c.as_str())
                .unwrap_or("uncategorized")
        );
    }
    Ok(())
}

pub async fn catalog_list(
    pool: &SqlitePool,
    page: Option<u32>,
    page_size: Option<u32>,
    search: Option<String>,
    category: Option<Category>,
    all: bool,
) -> anyhow::Result<()> {
    let mut tx = pool.begin().await?;
    let (permissions, count, num_page) = repository::permission::get_all_permissions(
        &mut tx,
        page,
        page_size,
        search,
        category,
        None,
        Some(all),
    )
    .await?;
    tx.commit().await?;
    println!("{} permission(s), {} page(s)", count, num_page);
    for permission in permissions {
        println!(
            "  {:<30} {:<30} [{}] priority={} active={}",
            permission.codename,
            permission.name,
            permission
                .category
                .map(|c| c.as_str())
                .unwrap_or("uncategorized"),
            permission.priority,
            permission.is_active
        );
    }
    Ok(())
}
