use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::prelude::FromRow;
use uuid::Uuid;

pub const TABLE_NAME: &str = "user_permission";

/// One grant (or revocation) of one permission for one user. Rows are audit
/// history: a revocation flips `is_active` in place, a re-grant adds a fresh
/// row. For power users an inactive row with no matching active row is a
/// suppression marker against their everything-by-default access.
#[derive(Clone, Debug, Deserialize, FromRow)]
pub struct UserPermission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub permission_id: Uuid,
    pub granted_by: Option<Uuid>,
    pub granted_at: DateTime<Utc>,
    pub revoked_by: Option<Uuid>,
    pub revoked_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub notes: Option<String>,
}
