mod announcement_repository;
mod member_repository;
mod role_preferences;

pub use announcement_repository::*;
pub use member_repository::*;
pub use role_preferences::*;
