use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 评分周期（学期、季度等）
///
/// 日期区间只用于把任务归入周期，不参与成绩计算。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/period.ts")]
pub struct Period {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    pub weight: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub sort_order: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Period {
    /// 日期是否落在周期的闭区间内，未设置区间的周期不匹配任何日期
    pub fn contains(&self, date: NaiveDate) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= date && date <= end,
            (Some(start), None) => start <= date,
            (None, Some(end)) => date <= end,
            (None, None) => false,
        }
    }
}
