use chrono::{DateTime, Utc};
use fake::{Dummy, Fake, Faker};
use serde::Deserialize;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::model::user::{Role, User, TABLE_NAME};

pub struct UserFactory<T: Clone> {
    modifier_one: fn(x: &User, ext: T) -> User,
    modifier_many: fn(x: &User, idx: usize, ext: T) -> User,
}

impl<T: Clone> Default for UserFactory<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> UserFactory<T> {
    pub fn new() -> Self {
        Self {
            modifier_one: |x, _| x.clone(),
            modifier_many: |x, _, _| x.clone(),
        }
    }

    pub fn modified_one(&mut self, modifier: fn(x: &User, ext: T) -> User) {
        self.modifier_one = modifier
    }

    pub fn modified_many(&mut self, modifier: fn(x: &User, idx: usize, ext: T) -> User) {
        self.modifier_many = modifier
    }

    pub async fn generate_one(&mut self, db: &SqlitePool, ext: T) -> anyhow::Result<User> {
        let data = UserDummy::new();
        let data = data.generate_one();
        let data = (self.modifier_one)(&data, ext);
        insert_user(db, &data).await?;
        Ok(data)
    }

    pub async fn generate_many(
        &mut self,
        db: &SqlitePool,
        num: u32,
        ext: T,
    ) -> anyhow::Result<Vec<User>> {
        let data = UserDummy::new();
        let data = data.generate_many(num);
        let mut result: Vec<User> = vec![];
        for (idx, item) in data.iter().enumerate() {
            result.push((self.modifier_many)(item, idx, ext.clone()));
        }
        let mut tx = db.begin().await?;
        for item in result.iter() {
            sqlx::query(
                format!(
                    "INSERT INTO {} (id, email, user_type, is_power_user, is_superuser,
                is_active, created_date, updated_date)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                    TABLE_NAME
                )
                .as_str(),
            )
            .bind(item.id)
            .bind(&item.email)
            .bind(item.user_type)
            .bind(item.is_power_user)
            .bind(item.is_superuser)
            .bind(item.is_active)
            .bind(item.created_date)
            .bind(item.updated_date)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(result)
    }
}

async fn insert_user(db: &SqlitePool, user: &User) -> anyhow::Result<()> {
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
    .execute(db)
    .await?;
    Ok(())
}

#[allow(dead_code)]
#[derive(Debug, Default, Deserialize, Dummy, Clone)]
struct UserDummy {
    pub id: Uuid,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}

impl UserDummy {
    pub fn new() -> Self {
        Faker.fake::<Self>()
    }

    pub fn generate_one(&self) -> User {
        let dummy = Faker.fake::<UserDummy>();
        User {
            id: dummy.id,
            email: format!("user_{}@example.edu", dummy.id.simple()),
            user_type: Some(Role::Faculty),
            is_power_user: false,
            is_superuser: false,
            is_active: true,
            created_date: dummy.created_date,
            updated_date: dummy.updated_date,
        }
    }

    pub fn generate_many(&self, num: u32) -> Vec<User> {
        let mut result: Vec<User> = vec![];
        for _ in 0..num {
            result.push(self.generate_one());
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use crate::{
        factory::user::UserFactory,
        model::user::{Role, User, TABLE_NAME},
    };

    #[sqlx::test]
    async fn test_generate_one_modified(pool: SqlitePool) -> anyhow::Result<()> {
        // When
        let mut factory = UserFactory::<()>::new();
        factory.modified_one(|data, _| User {
            email: "officer@cse.edu".to_string(),
            user_type: Some(Role::Officer),
            is_power_user: true,
            ..data.clone()
        });
        factory.generate_one(&pool, ()).await?;

        // Expect
        let res: Option<User> = sqlx::query_as(format!("SELECT * FROM {}", TABLE_NAME).as_str())
            .fetch_optional(&pool)
            .await?;
        assert!(res.is_some());
        let res = res.unwrap();
        assert_eq!(res.email, "officer@cse.edu".to_string());
        assert_eq!(res.user_type, Some(Role::Officer));
        assert!(res.is_power_user);
        assert!(!res.is_superuser);
        Ok(())
    }

    #[sqlx::test]
    async fn test_generate_many(pool: SqlitePool) -> anyhow::Result<()> {
        // When
        let mut factory = UserFactory::new();
        factory.generate_many(&pool, 5, ()).await?;

        // Expect
        let num_data: (i64,) =
            sqlx::query_as(format!("SELECT COUNT(*) FROM {}", TABLE_NAME).as_str())
                .fetch_one(&pool)
                .await?;
        assert_eq!(num_data.0, 5);
        Ok(())
    }
}
