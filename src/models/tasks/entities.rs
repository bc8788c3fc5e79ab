use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 计分任务（作业、测验、考试）
///
/// weight 是相对同组其他任务的权重，不要求加起来等于 100。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct Task {
    pub id: i64,
    pub class_id: i64,
    pub period_id: i64,
    pub category_id: Option<i64>,
    pub title: String,
    pub max_points: f64,
    pub weight: f64,
    pub due_date: Option<NaiveDate>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
