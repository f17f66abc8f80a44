use sqlx::{Sqlite, Transaction};
use uuid::Uuid;

use crate::{
    core::sqlx_utils::{binds_query_as, query_builder, SqlxBinds},
    model::permission::{Category, Permission, TABLE_NAME},
};

pub async fn get_all_permissions(
    tx: &mut Transaction<'_, Sqlite>,
    page: Option<u32>,
    page_size: Option<u32>,
    search: Option<String>,
    category: Option<Category>,
    is_active: Option<bool>,
    all: Option<bool>,
) -> anyhow::Result<(Vec<Permission>, u32, u32)> {
    let page = page.unwrap_or(1);
    let page_size = page_size.unwrap_or(10);
    let all = all.unwrap_or(false);
    let mut binds: Vec<SqlxBinds> = vec![];
    let mut filters: Vec<String> = vec![];

    if let Some(search) = search {
        let pattern = format!("%{}%", search);
        binds.push(SqlxBinds::String(pattern.clone()));
        binds.push(SqlxBinds::String(pattern));
        filters.push("(codename LIKE ? OR name LIKE ?)".to_string());
    }
    if let Some(category) = category {
        binds.push(SqlxBinds::String(category.as_str().to_string()));
        filters.push("category = ?".to_string());
    }
    if let Some(is_active) = is_active {
        binds.push(SqlxBinds::Bool(is_active));
        filters.push("is_active = ?".to_string());
    }

    let limit = match all {
        true => None,
        false => Some(page_size),
    };
    let offset = match all {
        true => None,
        false => Some((page - 1) * page_size),
    };
    let stmt = query_builder(
        None,
        TABLE_NAME,
        &filters,
        vec![
            "category ASC".to_string(),
            "priority ASC".to_string(),
            "name ASC".to_string(),
        ],
        limit,
        offset,
    );
    let stmt_count = query_builder(
        Some("count(id)".to_string()),
        TABLE_NAME,
        &filters,
        vec![],
        None,
        None,
    );

    let q = binds_query_as::<Permission>(&stmt, binds.clone());
    let q_count = binds_query_as::<(i64,)>(&stmt_count, binds);
    let data = q.fetch_all(&mut **tx).await?;
    let count = q_count.fetch_one(&mut **tx).await?;
    let num_page = match all {
        true => 0,
        false => (count.0 as u32).div_ceil(page_size),
    };
    Ok((data, count.0 as u32, num_page))
}

pub async fn get_all_active_permissions(
    tx: &mut Transaction<'_, Sqlite>,
) -> anyhow::Result<Vec<Permission>> {
    Ok(sqlx::query_as(
        format!(
            "SELECT * FROM {} WHERE is_active = TRUE
            ORDER BY category ASC, priority ASC, name ASC",
            TABLE_NAME
        )
        .as_str(),
    )
    .fetch_all(&mut **tx)
    .await?)
}

pub async fn get_permission_by_id(
    tx: &mut Transaction<'_, Sqlite>,
    id: &Uuid,
) -> anyhow::Result<Option<Permission>> {
    Ok(
        sqlx::query_as(format!("SELECT * FROM {} WHERE id = ?", TABLE_NAME).as_str())
            .bind(id)
            .fetch_optional(&mut **tx)
            .await?,
    )
}

pub async fn get_permission_by_codename(
    tx: &mut Transaction<'_, Sqlite>,
    codename: &str,
) -> anyhow::Result<Option<Permission>> {
    Ok(
        sqlx::query_as(format!("SELECT * FROM {} WHERE codename = ?", TABLE_NAME).as_str())
            .bind(codename)
            .fetch_optional(&mut **tx)
            .await?,
    )
}

pub async fn create_permission(
    tx: &mut Transaction<'_, Sqlite>,
    permission: &Permission,
) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            "INSERT INTO {} (id, codename, name, description, category,
        requires_role, priority, is_active, created_date)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(permission.id)
    .bind(&permission.codename)
    .bind(&permission.name)
    .bind(&permission.description)
    .bind(permission.category)
    .bind(&permission.requires_role)
    .bind(permission.priority)
    .bind(permission.is_active)
    .bind(permission.created_date)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn update_permission(
    tx: &mut Transaction<'_, Sqlite>,
    permission: &Permission,
) -> anyhow::Result<()> {
    sqlx::query(
        format!(
            "UPDATE {}
        SET codename = ?, name = ?, description = ?, category = ?,
        requires_role = ?, priority = ?, is_active = ?, created_date = ?
        WHERE id = ?",
            TABLE_NAME
        )
        .as_str(),
    )
    .bind(&permission.codename)
    .bind(&permission.name)
    .bind(&permission.description)
    .bind(permission.category)
    .bind(&permission.requires_role)
    .bind(permission.priority)
    .bind(permission.is_active)
    .bind(permission.created_date)
    .bind(permission.id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
