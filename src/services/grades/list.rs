use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::ApiResponse;
use crate::models::grades::requests::{GradeListParams, GradeListQuery};
use crate::services::{class_access, error_response};

pub async fn list_grades(
    service: &GradeService,
    request: &HttpRequest,
    class_id: i64,
    query: GradeListParams,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };

    let (page, size) = query.pagination.normalized();
    let mut list_query = GradeListQuery {
        page: Some(page as i64),
        size: Some(size as i64),
        student_id: query.student_id,
        task_id: query.task_id,
    };

    // 学生只能查看自己的成绩
    if !access.can_manage() {
        list_query.student_id = Some(access.user_id);
    }

    let storage = service.get_storage(request)?;
    match storage
        .list_grades_with_pagination(class_id, list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
