//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 日期列以 `YYYY-MM-DD` 字符串保存，时间戳列保存 Unix 秒。

pub mod prelude;

pub mod categories;
pub mod class_users;
pub mod classes;
pub mod grades;
pub mod periods;
pub mod tasks;
pub mod users;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn parse_date(value: Option<&str>) -> Option<chrono::NaiveDate> {
    value.and_then(|s| chrono::NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

pub(crate) fn format_date(value: Option<chrono::NaiveDate>) -> Option<String> {
    value.map(|d| d.format(DATE_FORMAT).to_string())
}

pub(crate) fn timestamp(ts: i64) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::<chrono::Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
