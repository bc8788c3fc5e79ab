pub mod categories;
pub mod classes;
pub mod gradebook;
pub mod grades;
pub mod periods;
pub mod system;
pub mod tasks;

pub use categories::CategoryService;
pub use classes::ClassService;
pub use gradebook::GradebookService;
pub use grades::GradeService;
pub use periods::PeriodService;
pub use system::SystemService;
pub use tasks::TaskService;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, http::StatusCode, web};
use std::sync::Arc;
use tracing::error;

use crate::errors::GradebookError;
use crate::middlewares::{ClassAccess, RequireClassRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 从应用数据中取出存储实例
pub(crate) fn storage_from_request(request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            actix_web::error::ErrorInternalServerError("Storage not configured")
        })
}

/// 取出 RequireClassRole 写入的班级访问身份
pub(crate) fn class_access(request: &HttpRequest) -> Result<ClassAccess, HttpResponse> {
    RequireClassRole::extract_class_access(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing class access",
        ))
    })
}

/// 仅班级教师或管理员可继续
pub(crate) fn require_manager(access: &ClassAccess) -> Result<(), HttpResponse> {
    if access.can_manage() {
        Ok(())
    } else {
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "Only class teachers can perform this action",
        )))
    }
}

/// 内部错误转换为 HTTP 响应
pub(crate) fn error_response(err: &GradebookError) -> HttpResponse {
    let status = match err {
        GradebookError::Validation(_)
        | GradebookError::DateParse(_)
        | GradebookError::CsvFormat(_) => StatusCode::BAD_REQUEST,
        e if e.is_record_level() => StatusCode::BAD_REQUEST,
        GradebookError::NotFound(_) => StatusCode::NOT_FOUND,
        GradebookError::Authentication(_) => StatusCode::UNAUTHORIZED,
        GradebookError::Authorization(_) => StatusCode::FORBIDDEN,
        _ => {
            error!("{}", err);
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    HttpResponse::build(status).json(ApiResponse::<()>::from_error(err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_status() {
        assert_eq!(
            error_response(&GradebookError::validation("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&GradebookError::invalid_task_definition("max")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&GradebookError::csv_format("bad row")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&GradebookError::not_found("task")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&GradebookError::database_operation("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
