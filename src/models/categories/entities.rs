use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 周期内的评分类别（作业、测验、考试……）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/category.ts")]
pub struct Category {
    pub id: i64,
    pub class_id: i64,
    pub period_id: i64,
    pub name: String,
    pub weight: f64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
