//! 成绩计算
//!
//! 本模块只做纯计算，不访问存储和缓存：调用方先从 `Storage` 加载好名单、周期、
//! 任务和成绩，再交给这里得出百分比、字母成绩和统计数据。
//!
//! - `normalize`: 原始分数 → 得分率
//! - `aggregate`: 加权得分率 → 百分比（任务、类别、周期、总评共用）
//! - `LetterScale`: 百分比 → 字母成绩
//! - `SummaryBuilder`: 名单 × 周期的成绩汇总
//! - `round_percentage`: 唯一的输出取整规则

mod aggregate;
mod bucket;
mod demo;
mod normalize;
mod report;
mod rounding;
mod scale;
mod stats;
mod summary;

pub use aggregate::{Weighted, WeightedItem, aggregate};
pub use bucket::period_for_date;
pub use demo::demo_grades;
pub use normalize::normalize;
pub use report::{StudentReport, build_student_report};
pub use rounding::{round_grade, round_percentage};
pub use scale::{Breakpoint, LetterScale};
pub use stats::class_stats;
pub use summary::{SummaryBuilder, SummaryOutcome, build_summary};

/// 诊断日志的 target，管理员可单独过滤
pub const DIAGNOSTICS_TARGET: &str = "gradebook::diagnostics";

#[cfg(test)]
mod test_support;
