use serde::Serialize;
use ts_rs::TS;

/// 健康检查响应
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct HealthResponse {
    pub status: String,
    pub system_name: String,
    pub version: String,
    pub environment: String,
    pub uptime_seconds: i64,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub grading: GradingDefaults,
}

/// 当前生效的成绩计算默认配置
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/system.ts")]
pub struct GradingDefaults {
    pub class_scale: String,
    pub report_scale: String,
    pub demo_fallback: bool,
}
