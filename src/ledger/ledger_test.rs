use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::{
    catalog::codenames,
    core::test_utils::{create_test_user, seed_catalog},
    ledger,
    model::{permission::Permission, user::Role},
    repository,
};

async fn permission_by_codename(pool: &SqlitePool, codename: &str) -> anyhow::Result<Permission> {
    let mut tx = pool.begin().await?;
    let permission = repository::permission::get_permission_by_codename(&mut tx, codename)
        .await?
        .expect("permission registered");
    tx.commit().await?;
    Ok(permission)
}

#[sqlx::test]
async fn grant_is_idempotent(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let permission = permission_by_codename(&pool, codenames::POST_NOTICES).await?;

    // When
    let mut tx = pool.begin().await?;
    let first = ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;
    let second = ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;

    // Expect
    assert_eq!(first.id, second.id);
    let active =
        repository::user_permission::count_active_grants(&mut tx, &officer.id, &permission.id)
            .await?;
    assert_eq!(active, 1);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn at_most_one_active_grant_after_any_sequence(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let permission = permission_by_codename(&pool, codenames::MANAGE_ALL_POSTS).await?;

    // When: a churn of grants and revocations
    let mut tx = pool.begin().await?;
    ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;
    ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;
    ledger::revoke(&mut tx, &officer, &permission, Some(&root)).await?;
    ledger::revoke(&mut tx, &officer, &permission, Some(&root)).await?;
    ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;
    ledger::revoke(&mut tx, &officer, &permission, Some(&root)).await?;
    ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;

    // Expect
    let active =
        repository::user_permission::count_active_grants(&mut tx, &officer.id, &permission.id)
            .await?;
    assert_eq!(active, 1);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn revoke_without_grant_is_a_noop_for_regular_actors(
    pool: SqlitePool,
) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let permission = permission_by_codename(&pool, codenames::POST_NOTICES).await?;

    // When / Expect
    let mut tx = pool.begin().await?;
    let revoked = ledger::revoke(&mut tx, &officer, &permission, Some(&root)).await?;
    assert!(revoked.is_none());
    let rows =
        repository::user_permission::get_grants_for_pair(&mut tx, &officer.id, &permission.id)
            .await?;
    assert!(rows.is_empty());
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn revoke_for_power_user_records_suppression_row(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let power = create_test_user(&pool, "p@cse.edu", Some(Role::Faculty), true, false).await?;
    let permission = permission_by_codename(&pool, codenames::EDIT_HEAD_MESSAGE).await?;

    // When: no grant rows exist, revoke must create the marker
    let mut tx = pool.begin().await?;
    let suppression = ledger::revoke(&mut tx, &power, &permission, Some(&root))
        .await?
        .expect("suppression row created");
    assert!(!suppression.is_active);
    assert_eq!(suppression.revoked_by, Some(root.id));
    assert!(suppression.revoked_at.is_some());

    // Revoking again reuses the marker (get-or-create)
    let again = ledger::revoke(&mut tx, &power, &permission, Some(&root))
        .await?
        .expect("existing suppression returned");
    assert_eq!(again.id, suppression.id);
    let rows = repository::user_permission::get_grants_for_pair(&mut tx, &power.id, &permission.id)
        .await?;
    assert_eq!(rows.len(), 1);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn regrant_creates_fresh_row_and_keeps_audit_history(
    pool: SqlitePool,
) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let permission = permission_by_codename(&pool, codenames::POST_NOTICES).await?;

    // When
    let mut tx = pool.begin().await?;
    let first = ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;
    ledger::revoke(&mut tx, &officer, &permission, Some(&root)).await?;
    let second = ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;

    // Expect: old revoked row preserved, new row active
    assert_ne!(first.id, second.id);
    let rows =
        repository::user_permission::get_grants_for_pair(&mut tx, &officer.id, &permission.id)
            .await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows.iter().filter(|r| r.is_active).count(), 1);
    assert_eq!(rows.iter().filter(|r| !r.is_active).count(), 1);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn store_rejects_second_active_row_for_pair(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let permission = permission_by_codename(&pool, codenames::POST_NOTICES).await?;

    // When: two raw inserts bypassing the ledger
    let stmt = "INSERT INTO user_permission (id, user_id, permission_id, granted_at, is_active)
        VALUES (?, ?, ?, ?, TRUE)";
    sqlx::query(stmt)
        .bind(Uuid::now_v7())
        .bind(officer.id)
        .bind(permission.id)
        .bind(Utc::now())
        .execute(&pool)
        .await?;
    let duplicate = sqlx::query(stmt)
        .bind(Uuid::now_v7())
        .bind(officer.id)
        .bind(permission.id)
        .bind(Utc::now())
        .execute(&pool)
        .await;

    // Expect: the partial unique index holds the line
    let err = duplicate.expect_err("duplicate active grant must be rejected");
    assert!(err
        .as_database_error()
        .is_some_and(|db| db.is_unique_violation()));
    Ok(())
}

#[sqlx::test]
async fn grant_notes_are_stored(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let permission = permission_by_codename(&pool, codenames::POST_NOTICES).await?;

    // When
    let mut tx = pool.begin().await?;
    let grant = ledger::grant(
        &mut tx,
        &officer,
        &permission,
        Some(&root),
        Some("covering notice desk this term".to_string()),
    )
    .await?;

    // Expect
    let stored =
        repository::user_permission::get_active_grant(&mut tx, &officer.id, &permission.id)
            .await?
            .unwrap();
    assert_eq!(stored.id, grant.id);
    assert_eq!(
        stored.notes.as_deref(),
        Some("covering notice desk this term")
    );
    assert_eq!(stored.granted_by, Some(root.id));
    tx.commit().await?;
    Ok(())
}
