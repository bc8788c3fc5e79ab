use crate::errors::{GradebookError, Result};

/// 将原始分数换算为得分率
///
/// 未评分返回 `Ok(None)`。满分不是正数时返回 `InvalidTaskDefinition`，不做除法。
/// 结果不截断，附加分可以让得分率超过 1。
pub fn normalize(score: Option<f64>, max_points: f64) -> Result<Option<f64>> {
    let Some(score) = score else {
        return Ok(None);
    };

    if !max_points.is_finite() || max_points <= 0.0 {
        return Err(GradebookError::invalid_task_definition(format!(
            "满分必须为正数，当前为 {max_points}"
        )));
    }

    Ok(Some(score / max_points))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ungraded_passes_through() {
        assert_eq!(normalize(None, 20.0), Ok(None));
    }

    #[test]
    fn test_fraction() {
        assert_relative_eq!(normalize(Some(18.0), 20.0).unwrap().unwrap(), 0.9);
        assert_eq!(normalize(Some(0.0), 50.0), Ok(Some(0.0)));
    }

    #[test]
    fn test_extra_credit_not_clamped() {
        assert_relative_eq!(normalize(Some(110.0), 100.0).unwrap().unwrap(), 1.1);
    }

    #[test]
    fn test_invalid_max_points() {
        for max in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = normalize(Some(10.0), max).unwrap_err();
            assert_eq!(err.code(), "E101");
        }
    }
}
