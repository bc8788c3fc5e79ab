use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::TaskService;
use crate::models::{
    ApiResponse,
    tasks::{requests::TaskListParams, responses::TaskListResponse},
};
use crate::services::error_response;

pub async fn list_tasks(
    service: &TaskService,
    request: &HttpRequest,
    class_id: i64,
    query: TaskListParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_tasks(class_id, query.period_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TaskListResponse { items },
            "Tasks retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
