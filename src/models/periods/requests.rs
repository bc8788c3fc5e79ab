use chrono::NaiveDate;
use serde::Deserialize;
use ts_rs::TS;

// 创建评分周期请求
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/period.ts")]
pub struct CreatePeriodRequest {
    pub name: String,
    pub weight: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_order: Option<i32>,
}
