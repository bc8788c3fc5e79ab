use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ClassService;
use crate::{
    middlewares::RequireJWT,
    models::{
        ApiResponse, ErrorCode,
        classes::requests::{ClassListQuery, ClassQueryParams},
        users::entities::UserRole,
    },
    services::error_response,
};

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let user = match RequireJWT::extract_user_claims(request) {
        Some(user) => user,
        None => {
            return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::Unauthorized,
                "Unauthorized: missing user id",
            )));
        }
    };

    let (page, size) = query.pagination.normalized();
    let mut list_query = ClassListQuery {
        page: Some(page as i64),
        size: Some(size as i64),
        search: query.search,
        ..Default::default()
    };

    // 按角色限定范围
    match user.role {
        UserRole::Admin => {}
        UserRole::Teacher => list_query.teacher_id = Some(user.id),
        UserRole::User => list_query.member_id = Some(user.id),
    }

    match storage.list_classes_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Class list retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
