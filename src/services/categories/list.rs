use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CategoryService;
use crate::models::{
    ApiResponse,
    categories::{requests::CategoryListParams, responses::CategoryListResponse},
};
use crate::services::error_response;

pub async fn list_categories(
    service: &CategoryService,
    request: &HttpRequest,
    class_id: i64,
    query: CategoryListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_categories(class_id, query.period_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CategoryListResponse { items },
            "Categories retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
