use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

use crate::model::user::Role;

pub const TABLE_NAME: &str = "permission";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Category {
    Office,
    Clubs,
    Designs,
    Users,
    Academics,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Office => "office",
            Category::Clubs => "clubs",
            Category::Designs => "designs",
            Category::Users => "users",
            Category::Academics => "academics",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "office" => Ok(Category::Office),
            "clubs" => Ok(Category::Clubs),
            "designs" => Ok(Category::Designs),
            "users" => Ok(Category::Users),
            "academics" => Ok(Category::Academics),
            other => Err(format!("unknown category: {other}")),
        }
    }
}

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct Permission {
    pub id: Uuid,
    pub codename: String,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<Category>,
    /// Roles allowed to hold this permission. Empty list = unrestricted.
    pub requires_role: Json<Vec<Role>>,
    /// Display priority, lower = more prominent.
    pub priority: i64,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
}
