use serde::Serialize;
use ts_rs::TS;

use super::entities::Period;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/period.ts")]
pub struct PeriodListResponse {
    pub items: Vec<Period>,
}
