pub mod categories;
pub mod class_users;
pub mod classes;
pub mod common;
pub mod gradebook;
pub mod grades;
pub mod periods;
pub mod system;
pub mod tasks;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};

// 应用启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
