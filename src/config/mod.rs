//! 配置管理
//!
//! 默认值 → config.toml → config.{APP_ENV}.toml → 环境变量，依次覆盖。

mod r#impl;
mod structs;

pub use structs::*;
