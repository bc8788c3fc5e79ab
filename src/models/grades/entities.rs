use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 单条成绩
///
/// score 为空表示尚未评分，汇总时跳过，不按 0 分计算。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct Grade {
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub task_id: i64,
    pub score: Option<f64>,
    pub grader_id: Option<i64>,
    pub comment: Option<String>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
