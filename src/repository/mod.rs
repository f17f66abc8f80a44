pub mod permission;
pub mod user;
pub mod user_permission;
