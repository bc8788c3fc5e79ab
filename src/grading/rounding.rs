use crate::models::gradebook::entities::GradeValue;

/// 输出取整：保留一位小数，0.5 远离零进位，再截断到 [0, 100]
///
/// 只在输出时调用，中间计算（包括由周期算总评）一律使用未取整的值。
pub fn round_percentage(x: f64) -> f64 {
    ((x * 10.0).round() / 10.0).clamp(0.0, 100.0)
}

/// 取整并转换为输出用的成绩值
pub fn round_grade(percentage: Option<f64>) -> GradeValue {
    GradeValue::from(percentage.map(round_percentage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_decimal() {
        assert_eq!(round_percentage(90.666_666), 90.7);
        assert_eq!(round_percentage(33.333_333), 33.3);
        assert_eq!(round_percentage(80.0), 80.0);
    }

    #[test]
    fn test_half_away_from_zero() {
        assert_eq!(round_percentage(72.25), 72.3);
        assert_eq!(round_percentage(0.25), 0.3);
    }

    #[test]
    fn test_clamped() {
        assert_eq!(round_percentage(112.5), 100.0);
        assert_eq!(round_percentage(100.04), 100.0);
        assert_eq!(round_percentage(-3.0), 0.0);
    }

    #[test]
    fn test_round_grade() {
        assert_eq!(round_grade(None), GradeValue::Ungraded);
        assert_eq!(round_grade(Some(88.88)), GradeValue::Graded(88.9));
    }
}
