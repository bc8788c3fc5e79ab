use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::CategoryService;
use crate::models::{ApiResponse, ErrorCode, categories::requests::CreateCategoryRequest};
use crate::services::{class_access, error_response, require_manager};
use crate::utils::validate::{validate_name, validate_weight};

pub async fn create_category(
    service: &CategoryService,
    request: &HttpRequest,
    class_id: i64,
    mut req: CreateCategoryRequest,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    if let Err(e) = validate_name("name", &req.name).and(validate_weight("weight", req.weight)) {
        return Ok(error_response(&e));
    }
    req.name = req.name.trim().to_string();

    let storage = service.get_storage(request)?;

    // 类别必须属于本班级的周期
    match storage.get_period(class_id, req.period_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::PeriodNotFound,
                "Period not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.create_category(class_id, req).await {
        Ok(category) => {
            info!(
                "Category {} created in class {} by user {}",
                category.id, class_id, access.user_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                category,
                "Category created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
