use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::models::{
    ApiResponse,
    class_users::{
        entities::ClassUserRole,
        requests::{ClassUserListParams, ClassUserQuery},
    },
};
use crate::services::{class_access, error_response, require_manager};

pub async fn list_students(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    query: ClassUserListParams,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    let storage = service.get_storage(request)?;
    let (page, size) = query.pagination.normalized();
    let list_query = ClassUserQuery {
        page: Some(page as i64),
        size: Some(size as i64),
        search: query.search,
        role: Some(ClassUserRole::Student),
    };

    match storage
        .list_class_users_with_pagination(class_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class students retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
