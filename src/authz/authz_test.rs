use sqlx::SqlitePool;

use crate::{
    authz,
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
async fn missing_or_inactive_actor_holds_nothing(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let user = create_test_user(&pool, "f@cse.edu", Some(Role::Faculty), true, false).await?;

    // When / Expect
    let mut tx = pool.begin().await?;
    assert!(!authz::has_permission(&mut tx, None, codenames::POST_NOTICES).await?);
    let mut inactive = user.clone();
    inactive.is_active = false;
    assert!(!authz::has_permission(&mut tx, Some(&inactive), codenames::POST_NOTICES).await?);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn superuser_bypasses_grant_state(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;

    // Expect: every codename resolves true, even unregistered ones
    let mut tx = pool.begin().await?;
    assert!(authz::has_permission(&mut tx, Some(&root), codenames::POST_NOTICES).await?);
    assert!(authz::has_permission(&mut tx, Some(&root), "no_such_permission").await?);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn regular_user_holds_nothing_by_default(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;

    // Expect
    let mut tx = pool.begin().await?;
    for def in crate::catalog::builtin_definitions() {
        assert!(
            !authz::has_permission(&mut tx, Some(&officer), def.codename).await?,
            "{} should be denied by default",
            def.codename
        );
    }
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn power_user_holds_everything_by_default(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let power = create_test_user(&pool, "p@cse.edu", Some(Role::Faculty), true, false).await?;

    // Expect
    let mut tx = pool.begin().await?;
    for def in crate::catalog::builtin_definitions() {
        assert!(
            authz::has_permission(&mut tx, Some(&power), def.codename).await?,
            "{} should be held by default",
            def.codename
        );
    }
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn power_user_cannot_hold_unknown_or_disabled_permission(
    pool: SqlitePool,
) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let power = create_test_user(&pool, "p@cse.edu", Some(Role::Faculty), true, false).await?;

    // When: disable one catalog entry
    let mut tx = pool.begin().await?;
    let mut permission =
        repository::permission::get_permission_by_codename(&mut tx, codenames::POST_ROUTINES)
            .await?
            .unwrap();
    permission.is_active = false;
    repository::permission::update_permission(&mut tx, &permission).await?;

    // Expect
    assert!(!authz::has_permission(&mut tx, Some(&power), "no_such_permission").await?);
    assert!(!authz::has_permission(&mut tx, Some(&power), codenames::POST_ROUTINES).await?);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn power_user_revocation_and_regrant_round_trip(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let power = create_test_user(&pool, "p@cse.edu", Some(Role::Faculty), true, false).await?;
    let permission = permission_by_codename(&pool, codenames::MANAGE_ALL_CLUBS).await?;

    // When: revoke the default
    let mut tx = pool.begin().await?;
    ledger::revoke(&mut tx, &power, &permission, Some(&root)).await?;
    assert!(!authz::has_permission(&mut tx, Some(&power), codenames::MANAGE_ALL_CLUBS).await?);

    // When: grant restores it
    ledger::grant(&mut tx, &power, &permission, Some(&root), None).await?;
    assert!(authz::has_permission(&mut tx, Some(&power), codenames::MANAGE_ALL_CLUBS).await?);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn officer_post_notices_end_to_end(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let permission = permission_by_codename(&pool, codenames::POST_NOTICES).await?;

    let mut tx = pool.begin().await?;
    assert!(!authz::has_permission(&mut tx, Some(&officer), codenames::POST_NOTICES).await?);

    // When: superuser grants
    ledger::grant(&mut tx, &officer, &permission, Some(&root), None).await?;
    assert!(authz::has_permission(&mut tx, Some(&officer), codenames::POST_NOTICES).await?);

    // When: superuser revokes
    let revoked = ledger::revoke(&mut tx, &officer, &permission, Some(&root))
        .await?
        .expect("active grant revoked");
    assert!(!authz::has_permission(&mut tx, Some(&officer), codenames::POST_NOTICES).await?);
    assert!(!revoked.is_active);
    assert!(revoked.revoked_at.is_some());
    assert_eq!(revoked.revoked_by, Some(root.id));
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn all_active_permissions_per_actor_class(pool: SqlitePool) -> anyhow::Result<()> {
    // Given
    let summary = seed_catalog(&pool).await?;
    let total = summary.created as usize;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let power = create_test_user(&pool, "p@cse.edu", Some(Role::Faculty), true, false).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let notices = permission_by_codename(&pool, codenames::POST_NOTICES).await?;
    let routines = permission_by_codename(&pool, codenames::POST_ROUTINES).await?;

    let mut tx = pool.begin().await?;
    // Regular actor: only explicit grants
    assert!(authz::all_active_permissions(&mut tx, &officer).await?.is_empty());
    ledger::grant(&mut tx, &officer, &notices, Some(&root), None).await?;
    ledger::grant(&mut tx, &officer, &routines, Some(&root), None).await?;
    let held = authz::all_active_permissions(&mut tx, &officer).await?;
    assert_eq!(held.len(), 2);

    // Power user: everything minus explicit revocations
    assert_eq!(authz::all_active_permissions(&mut tx, &power).await?.len(), total);
    ledger::revoke(&mut tx, &power, &notices, Some(&root)).await?;
    let held = authz::all_active_permissions(&mut tx, &power).await?;
    assert_eq!(held.len(), total - 1);
    assert!(!held.iter().any(|p| p.codename == codenames::POST_NOTICES));

    // Superuser: everything
    assert_eq!(authz::all_active_permissions(&mut tx, &root).await?.len(), total);
    tx.commit().await?;
    Ok(())
}

#[sqlx::test]
async fn can_grant_requires_power_user_with_manage_permission(
    pool: SqlitePool,
) -> anyhow::Result<()> {
    // Given
    seed_catalog(&pool).await?;
    let root = create_test_user(&pool, "root@cse.edu", None, false, true).await?;
    let power = create_test_user(&pool, "p@cse.edu", Some(Role::Faculty), true, false).await?;
    let officer = create_test_user(&pool, "o@cse.edu", Some(Role::Officer), false, false).await?;
    let manage = permission_by_codename(&pool, codenames::MANAGE_USER_PERMISSIONS).await?;

    let mut tx = pool.begin().await?;
    // Power users hold it by default
    assert!(authz::can_grant_permissions(&mut tx, &power).await?);

    // Suppressing the default removes the ability
    ledger::revoke(&mut tx, &power, &manage, Some(&root)).await?;
    assert!(!authz::can_grant_permissions(&mut tx, &power).await?);

    // Regular actors never qualify, explicit grant or not
    ledger::grant(&mut tx, &officer, &manage, Some(&root), None).await?;
    assert!(!authz::can_grant_permissions(&mut tx, &officer).await?);
    tx.commit().await?;
    Ok(())
}
