pub mod db;
pub mod perm;
pub mod user;
