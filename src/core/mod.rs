pub mod db;
pub mod sqlx_utils;
pub mod test_utils;
pub mod utils;
