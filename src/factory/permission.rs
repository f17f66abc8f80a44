use chrono::{DateTime, Utc};
use fake::{Dummy, Fake, Faker};
use serde::Deserialize;
use sqlx::types::Json;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::model::permission::{Category, Permission, TABLE_NAME};

pub struct PermissionFactory<T: Clone> {
    modifier_one: fn(x: &Permission, ext: T) -> Permission,
    modifier_many: fn(x: &Permission, idx: usize, ext: T) -> Permission,
}

impl<T: Clone> Default for PermissionFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> PermissionFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &Permission, ext: T) -> Permission) {
        self.modifier_one = modifier
    }

    pub fn modified_many(
        &mut self,
        modifier: fn(x: &Permission, idx: usize, ext: T) -> Permission,
    ) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(&mut self, db: &SqlitePool, ext: T) -> anyhow::Result<Permission> {
        let data = PermissionDummy::new();
        let data = data.generate_one();
        let data = (self.modifier_one)(&data, ext);
        insert_permission(db, &data).await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        db: &SqlitePool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<Permission>> {
        let data = PermissionDummy::new();
        let data = data.generate_many(num);
        let mut result: Vec<Permission> = vec![];
        for (idx, item) in data.iter().enumerate() {
            result.push((self.modifier_many)(item, idx, ext.clone()));
        }
        let mut tx = db.begin().await?;
        for item in result.iter() {
            sqlx::query(
                format!(
                    "INSERT INTO {} (id, codename, name, description, category,
                requires_role, priority, is_active, created_date)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
                    TABLE_NAME
                )
                .as_str(),
            )
            .bind(item.id)
            .bind(&item.codename)
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.category)
            .bind(&item.requires_role)
            .bind(item.priority)
            .bind(item.is_active)
            .bind(item.created_date)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(result)
    }
}

async fn insert_permission(db: &SqlitePool, permission: &Permission) -> anyhow::Result<()> {
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
    .execute(db)
    .await?;
    Ok(())
}

#[allow(dead_code)]
#[derive(Debug, Default, Deserialize, Dummy, Clone)]
struct PermissionDummy {
    pub id: Uuid,
    pub codename: String,
    pub name: String,
    pub description: Option<String>,
    pub priority: u8,
    pub created_date: DateTime<Utc>,
}

impl PermissionDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> Permission {
        let dummy = Faker.fake::<PermissionDummy>();
        Permission {
            id: dummy.id,
            codename: format!("perm_{}", dummy.id.simple()),
            name: dummy.name,
            description: dummy.description,
            category: Some(Category::Office),
            requires_role: Json(vec![]),
            priority: dummy.priority as i64,
            is_active: true,
            created_date: dummy.created_date,
        }
    }

    pub fn generate_many(&self, num: u32) -> Vec<Permission> {
        let mut result: Vec<Permission> = vec![];
        for _ in 0..num {
            result.push(self.generate_one());
        }
        result
    }
}
