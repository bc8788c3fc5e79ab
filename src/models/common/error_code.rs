use serde::Serialize;
use ts_rs::TS;

/// 业务错误码（随 ApiResponse.code 返回给前端）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误
    BadRequest = 1000,
    ValidationFailed = 1001,
    Unauthorized = 1002,
    Forbidden = 1003,
    NotFound = 1004,
    RateLimitExceeded = 1005,
    InternalServerError = 1099,

    // 用户与班级
    UserNotFound = 2000,
    ClassNotFound = 2100,
    ClassPermissionDenied = 2101,
    StudentNotInClass = 2102,

    // 评分结构
    PeriodNotFound = 3000,
    PeriodCreationFailed = 3001,
    CategoryNotFound = 3100,
    TaskNotFound = 3200,
    InvalidTaskDefinition = 3201,

    // 成绩
    GradeNotFound = 4000,
    GradeUpdateFailed = 4001,
    OrphanGradeReference = 4002,

    // 导入导出
    FileUploadFailed = 5000,
    ImportFileParseFailed = 5001,
    ImportFileMissingColumn = 5002,
    ImportFileDataInvalid = 5003,
    ExportFailed = 5004,
}

impl From<&crate::errors::GradebookError> for ErrorCode {
    fn from(err: &crate::errors::GradebookError) -> Self {
        use crate::errors::GradebookError;
        match err {
            GradebookError::Validation(_) | GradebookError::DateParse(_) => {
                ErrorCode::ValidationFailed
            }
            GradebookError::NotFound(_) => ErrorCode::NotFound,
            GradebookError::Authentication(_) => ErrorCode::Unauthorized,
            GradebookError::Authorization(_) => ErrorCode::Forbidden,
            GradebookError::InvalidTaskDefinition(_) => ErrorCode::InvalidTaskDefinition,
            GradebookError::OrphanGradeReference(_) => ErrorCode::OrphanGradeReference,
            GradebookError::CsvFormat(_) => ErrorCode::ImportFileParseFailed,
            _ => ErrorCode::InternalServerError,
        }
    }
}
