use serde::Serialize;
use ts_rs::TS;

use super::entities::Category;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/category.ts")]
pub struct CategoryListResponse {
    pub items: Vec<Category>,
}
