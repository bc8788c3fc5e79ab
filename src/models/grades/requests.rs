use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::PaginationQuery;

// 录入/修改成绩请求，score 为 null 时清除成绩
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct UpsertGradeRequest {
    pub student_id: i64,
    pub task_id: i64,
    #[serde(default)]
    pub score: Option<f64>,
    pub comment: Option<String>,
}

// 成绩列表查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/grade.ts")]
pub struct GradeListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub student_id: Option<i64>,
    pub task_id: Option<i64>,
}

// 成绩列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct GradeListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub student_id: Option<i64>,
    pub task_id: Option<i64>,
}
