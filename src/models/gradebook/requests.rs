use serde::Deserialize;
use ts_rs::TS;

// 成绩册查询参数，scale 为空时使用配置中的默认等级制
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/gradebook.ts")]
pub struct GradebookQuery {
    pub scale: Option<String>,
}
