use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "base_user";

/// Closed set of profile roles. Superusers carry no role (`user_type` is
/// NULL for them), everyone else has exactly one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Role {
    Faculty,
    Staff,
    Officer,
    ClubMember,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Faculty => "faculty",
            Role::Staff => "staff",
            Role::Officer => "officer",
            Role::ClubMember => "club_member",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "faculty" => Ok(Role::Faculty),
            "staff" => Ok(Role::Staff),
            "officer" => Ok(Role::Officer),
            "club_member" => Ok(Role::ClubMember),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub user_type: Option<Role>,
    pub is_power_user: bool,
    pub is_superuser: bool,
    pub is_active: bool,
    pub created_date: DateTime<Utc>,
    pub updated_date: DateTime<Utc>,
}
