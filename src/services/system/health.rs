use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};

use super::SystemService;
use crate::models::{
    ApiResponse, AppStartTime,
    system::responses::{GradingDefaults, HealthResponse},
};

/// 健康检查，同时返回当前生效的成绩计算默认配置
pub async fn health(service: &SystemService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    let started_at = request
        .app_data::<web::Data<AppStartTime>>()
        .map(|t| t.start_datetime)
        .unwrap_or_else(chrono::Utc::now);
    let uptime_seconds = (chrono::Utc::now() - started_at).num_seconds().max(0);

    let response = HealthResponse {
        status: "ok".to_string(),
        system_name: config.app.system_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.app.environment.clone(),
        uptime_seconds,
        started_at,
        grading: GradingDefaults {
            class_scale: config.grading.class_scale.clone(),
            report_scale: config.grading.report_scale.clone(),
            demo_fallback: config.demo_fallback_enabled(),
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Service is healthy")))
}
