use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/category.ts")]
pub struct CreateCategoryRequest {
    pub period_id: i64,
    pub name: String,
    pub weight: f64,
}

// 类别列表过滤参数
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/category.ts")]
pub struct CategoryListParams {
    pub period_id: Option<i64>,
}
