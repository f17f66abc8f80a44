use chrono::Utc;
use sqlx::types::Json;
use sqlx::{Sqlite, Transaction};
use tracing::info;
use uuid::Uuid;

use crate::{
    model::{
        permission::{Category, Permission},
        user::Role,
    },
    repository,
};


/// Permission codenames used throughout the application.
pub mod codenames {
    // Office
    pub const POST_NOTICES: &str = "post_notices";
    pub const MANAGE_ALL_POSTS: &str = "manage_all_posts";
    pub const POST_ROUTINES: &str = "post_routines";
    pub const POST_ADMISSION_RESULTS: &str = "post_admission_results";
    // Clubs
    pub const MANAGE_ALL_CLUBS: &str = "manage_club_settings";
    // Designs
    pub const EDIT_FEATURE_CARDS: &str = "edit_feature_cards";
    pub const EDIT_HEAD_MESSAGE: &str = "edit_head_message";
    pub const MANAGE_ACADEMIC_CALENDARS: &str = "manage_academic_calendars";
    // User management
    pub const MANAGE_USER_PERMISSIONS: &str = "manage_user_permissions";
    // Publications
    pub const MANAGE_ALL_PUBLICATIONS: &str = "manage_all_publications";
}

#[derive(Clone, Debug)]
pub struct PermissionDef {
    pub codename: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: Category,
    pub requires_role: &'static [Role],
    pub priority: i64,
}

/// Definitions registered by `register`. Additive: entries removed here are
/// not deleted from the store.
pub fn builtin_definitions() -> Vec<PermissionDef> {
    vec![
        PermissionDef {
            codename: codenames::POST_NOTICES,
            name: "Post Notices",
            description: "Can create and edit office notices",
            category: Category::Office,
            requires_role: &[Role::Faculty, Role::Officer],
            priority: 10,
        },
        PermissionDef {
            codename: codenames::MANAGE_ALL_POSTS,
            name: "Manage All Posts",
            description: "Can create, edit, and delete all office posts",
            category: Category::Office,
            requires_role: &[Role::Faculty, Role::Officer],
            priority: 20,
        },
        PermissionDef {
            codename: codenames::POST_ROUTINES,
            name: "Post Routines",
            description: "Can create and manage class routines",
            category: Category::Office,
            requires_role: &[Role::Faculty, Role::Officer],
            priority: 30,
        },
        PermissionDef {
            codename: codenames::POST_ADMISSION_RESULTS,
            name: "Post Admission Results",
            description: "Can publish admission test results",
            category: Category::Office,
            requires_role: &[Role::Faculty, Role::Officer],
            priority: 40,
        },
        PermissionDef {
            codename: codenames::MANAGE_ALL_CLUBS,
            name: "Manage All Clubs",
            description: "Can create, edit, and manage all clubs",
            category: Category::Clubs,
            requires_role: &[Role::Faculty, Role::Officer],
            priority: 10,
        },
        PermissionDef {
            codename: codenames::EDIT_FEATURE_CARDS,
            name: "Edit Feature Cards",
            description: "Can edit feature cards on the homepage",
            category: Category::Designs,
            requires_role: &[],
            priority: 10,
        },
        PermissionDef {
            codename: codenames::EDIT_HEAD_MESSAGE,
            name: "Edit Head Message",
            description: "Can edit message from the head",
            category: Category::Designs,
            requires_role: &[],
            priority: 20,
        },
        PermissionDef {
            codename: codenames::MANAGE_ACADEMIC_CALENDARS,
            name: "Manage Academic Calendars",
            description: "Can create, edit, and delete academic calendars",
            category: Category::Designs,
            requires_role: &[Role::Faculty, Role::Officer],
            priority: 30,
        },
        PermissionDef {
            codename: codenames::MANAGE_USER_PERMISSIONS,
            name: "Manage User Permissions",
            description: "Can grant/revoke permissions and create users",
            category: Category::Users,
            requires_role: &[],
            priority: 10,
        },
        PermissionDef {
            codename: codenames::MANAGE_ALL_PUBLICATIONS,
            name: "Manage All Publications",
            description: "Can manage publications for all faculty members",
            category: Category::Users,
            requires_role: &[],
            priority: 20,
        },
    ]
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
}

/// Idempotent upsert of catalog definitions keyed by codename. Existing rows
/// are rewritten only when a mutable field differs; a soft-deleted row that
/// reappears in the definitions is re-activated.
pub async fn register(
    tx: &mut Transaction<'_, Sqlite>,
    definitions: &[PermissionDef],
) -> anyhow::Result<RegisterSummary> {
    let mut summary = RegisterSummary::default();
    for def in definitions {
        match repository::permission::get_permission_by_codename(tx, def.codename).await? {
            None => {
                let permission = Permission {
                    id: Uuid::now_v7(),
                    codename: def.codename.to_string(),
                    name: def.name.to_string(),
                    description: Some(def.description.to_string()),
                    category: Some(def.category),
                    requires_role: Json(def.requires_role.to_vec()),
                    priority: def.priority,
                    is_active: true,
                    created_date: Utc::now(),
                };
                repository::permission::create_permission(tx, &permission).await?;
                summary.created += 1;
                info!(codename = def.codename, "created permission");
            }
            Some(mut existing) => {
                let mut changed = false;
                if existing.name != def.name {
                    existing.name = def.name.to_string();
                    changed = true;
                }
                if existing.description.as_deref() != Some(def.description) {
                    existing.description = Some(def.description.to_string());
                    changed = true;
                }
                if existing.category != Some(def.category) {
                    existing.category = Some(def.category);
                    changed = true;
                }
                if existing.requires_role.0 != def.requires_role {
                    existing.requires_role = Json(def.requires_role.to_vec());
                    changed = true;
                }
                if existing.priority != def.priority {
                    existing.priority = def.priority;
                    changed = true;
                }
                if !existing.is_active {
                    existing.is_active = true;
                    changed = true;
                }
                if changed {
                    repository::permission::update_permission(tx, &existing).await?;
                    summary.updated += 1;
                    info!(codename = def.codename, "updated permission");
                } else {
                    summary.skipped += 1;
                }
            }
        }
    }
    Ok(summary)
}
