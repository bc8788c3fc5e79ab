use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PeriodService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{class_access, error_response, require_manager};

pub async fn delete_period(
    service: &PeriodService,
    request: &HttpRequest,
    class_id: i64,
    period_id: i64,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    match storage.delete_period(class_id, period_id).await {
        Ok(true) => {
            info!(
                "Period {} deleted from class {} by user {}",
                period_id, class_id, access.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Period deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::PeriodNotFound,
            "Period not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
