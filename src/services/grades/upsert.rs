use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::GradeService;
use crate::models::class_users::entities::ClassUserRole;
use crate::models::grades::requests::UpsertGradeRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{class_access, error_response, require_manager};
use crate::utils::validate::validate_score;

pub async fn upsert_grade(
    service: &GradeService,
    request: &HttpRequest,
    class_id: i64,
    mut req: UpsertGradeRequest,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    if let Err(e) = validate_score(req.score) {
        return Ok(error_response(&e));
    }
    req.comment = req
        .comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let storage = service.get_storage(request)?;

    // 任务必须属于本班级
    match storage.get_task(class_id, req.task_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TaskNotFound,
                "Task not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    // 学生必须是班级成员
    match storage
        .get_class_user_by_user_id_and_class_id(req.student_id, class_id)
        .await
    {
        Ok(Some(member)) if member.role == ClassUserRole::Student => {}
        Ok(_) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::StudentNotInClass,
                "Student is not enrolled in this class",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    }

    match storage.upsert_grade(class_id, access.user_id, req).await {
        Ok(grade) => {
            info!(
                "Grade for student {} task {} set to {:?} by user {}",
                grade.student_id, grade.task_id, grade.score, access.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade saved successfully")))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
