use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

// 创建任务请求
//
// period_id 为空时按 due_date 归入所在周期
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct CreateTaskRequest {
    pub period_id: Option<i64>,
    pub category_id: Option<i64>,
    pub title: String,
    pub max_points: f64,
    pub weight: f64,
    pub due_date: Option<NaiveDate>,
}

// 更新任务请求
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct UpdateTaskRequest {
    pub category_id: Option<i64>,
    pub title: Option<String>,
    pub max_points: Option<f64>,
    pub weight: Option<f64>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/task.ts")]
pub struct TaskListParams {
    pub period_id: Option<i64>,
}
