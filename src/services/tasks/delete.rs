use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TaskService;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{class_access, error_response, require_manager};

pub async fn delete_task(
    service: &TaskService,
    request: &HttpRequest,
    class_id: i64,
    task_id: i64,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    match storage.delete_task(class_id, task_id).await {
        Ok(true) => {
            info!(
                "Task {} deleted from class {} by user {}",
                task_id, class_id, access.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Task deleted successfully")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TaskNotFound,
            "Task not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
