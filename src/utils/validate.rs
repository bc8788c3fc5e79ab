//! 请求参数校验
//!
//! 校验失败返回 `GradebookError::Validation`，任务满分非法返回
//! `GradebookError::InvalidTaskDefinition`。

use chrono::NaiveDate;

use crate::errors::{GradebookError, Result};

pub const MAX_NAME_LENGTH: usize = 128;
pub const MAX_WEIGHT: f64 = 100.0;

/// 名称：去除首尾空白后非空，且不超过 128 个字符
pub fn validate_name(field: &str, value: &str) -> Result<()> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(GradebookError::validation(format!("{field} must not be empty")));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(GradebookError::validation(format!(
            "{field} must be at most {MAX_NAME_LENGTH} characters"
        )));
    }
    Ok(())
}

/// 权重：有限值且位于 [0, 100]
pub fn validate_weight(field: &str, weight: f64) -> Result<()> {
    if !weight.is_finite() || !(0.0..=MAX_WEIGHT).contains(&weight) {
        return Err(GradebookError::validation(format!(
            "{field} must be between 0 and {MAX_WEIGHT}, got {weight}"
        )));
    }
    Ok(())
}

/// 满分：有限正数
pub fn validate_max_points(max_points: f64) -> Result<()> {
    if !max_points.is_finite() || max_points <= 0.0 {
        return Err(GradebookError::invalid_task_definition(format!(
            "max_points must be a positive number, got {max_points}"
        )));
    }
    Ok(())
}

/// 得分：为空表示清除，否则必须是非负有限值
pub fn validate_score(score: Option<f64>) -> Result<()> {
    match score {
        Some(s) if !s.is_finite() || s < 0.0 => Err(GradebookError::validation(format!(
            "score must be a non-negative number, got {s}"
        ))),
        _ => Ok(()),
    }
}

/// 周期日期范围：两端都给出时 start <= end
pub fn validate_date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(GradebookError::validation(format!(
            "start_date {start} is after end_date {end}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("name", "Term 1").is_ok());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", &"x".repeat(129)).is_err());
        assert!(validate_name("name", &"测".repeat(128)).is_ok());
    }

    #[test]
    fn test_validate_weight_bounds() {
        assert!(validate_weight("weight", 0.0).is_ok());
        assert!(validate_weight("weight", 100.0).is_ok());
        assert!(validate_weight("weight", -0.5).is_err());
        assert!(validate_weight("weight", 100.5).is_err());
        assert!(validate_weight("weight", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_max_points_uses_task_definition_error() {
        assert!(validate_max_points(10.0).is_ok());
        let err = validate_max_points(0.0).unwrap_err();
        assert_eq!(err.code(), "E101");
        assert!(validate_max_points(f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_score() {
        assert!(validate_score(None).is_ok());
        assert!(validate_score(Some(0.0)).is_ok());
        // 允许超过满分（加分）
        assert!(validate_score(Some(120.0)).is_ok());
        assert!(validate_score(Some(-1.0)).is_err());
        assert!(validate_score(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok();
        assert!(validate_date_range(d("2025-01-01"), d("2025-03-31")).is_ok());
        assert!(validate_date_range(d("2025-01-01"), d("2025-01-01")).is_ok());
        assert!(validate_date_range(d("2025-04-01"), d("2025-03-31")).is_err());
        assert!(validate_date_range(None, d("2025-03-31")).is_ok());
    }
}
