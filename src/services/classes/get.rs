use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::ApiResponse;
use crate::services::class_access;

pub async fn get_class(_service: &ClassService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    // 班级已由 RequireClassRole 加载
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        access.class,
        "Class retrieved successfully",
    )))
}
