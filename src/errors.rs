//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_gradebook_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq)]
        pub enum GradebookError {
            $($variant(String),)*
        }

        impl GradebookError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(GradebookError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(GradebookError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl GradebookError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        GradebookError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_gradebook_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    DateParse("E010", "Date Parse Error"),
    Authentication("E011", "Authentication Error"),
    Authorization("E012", "Authorization Error"),
    InvalidTaskDefinition("E101", "Invalid Task Definition"),
    OrphanGradeReference("E102", "Orphan Grade Reference"),
    CsvFormat("E103", "CSV Format Error"),
}

impl GradebookError {
    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 是否为单条成绩记录层面的可恢复错误（汇总计算时跳过而非中止）
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            GradebookError::InvalidTaskDefinition(_) | GradebookError::OrphanGradeReference(_)
        )
    }
}

impl fmt::Display for GradebookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for GradebookError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for GradebookError {
    fn from(err: sea_orm::DbErr) -> Self {
        GradebookError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for GradebookError {
    fn from(err: std::io::Error) -> Self {
        GradebookError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for GradebookError {
    fn from(err: serde_json::Error) -> Self {
        GradebookError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for GradebookError {
    fn from(err: chrono::ParseError) -> Self {
        GradebookError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for GradebookError {
    fn from(err: csv::Error) -> Self {
        GradebookError::CsvFormat(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GradebookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(GradebookError::cache_connection("test").code(), "E001");
        assert_eq!(GradebookError::database_config("test").code(), "E003");
        assert_eq!(GradebookError::validation("test").code(), "E007");
        assert_eq!(GradebookError::authentication("test").code(), "E011");
        assert_eq!(GradebookError::invalid_task_definition("test").code(), "E101");
        assert_eq!(GradebookError::orphan_grade_reference("test").code(), "E102");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            GradebookError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            GradebookError::invalid_task_definition("test").error_type(),
            "Invalid Task Definition"
        );
    }

    #[test]
    fn test_error_message() {
        let err = GradebookError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = GradebookError::invalid_task_definition("max_points must be positive");
        let formatted = err.format_simple();
        assert!(formatted.contains("Invalid Task Definition"));
        assert!(formatted.contains("max_points must be positive"));
    }

    #[test]
    fn test_record_level_errors() {
        assert!(GradebookError::orphan_grade_reference("grade 1").is_record_level());
        assert!(GradebookError::invalid_task_definition("task 1").is_record_level());
        assert!(!GradebookError::database_operation("boom").is_record_level());
    }
}
