use chrono::NaiveDate;

use crate::models::periods::entities::Period;

/// 按日期查找所属周期
///
/// 区间为闭区间；多个周期重叠时取 sort_order 最小的那个。
pub fn period_for_date(periods: &[Period], date: NaiveDate) -> Option<&Period> {
    periods
        .iter()
        .filter(|p| p.contains(date))
        .min_by_key(|p| (p.sort_order, p.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(id: i64, sort_order: i32, start: Option<&str>, end: Option<&str>) -> Period {
        let parse = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        Period {
            id,
            class_id: 1,
            name: format!("P{id}"),
            weight: 50.0,
            start_date: start.map(parse),
            end_date: end.map(parse),
            sort_order,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_inclusive_bounds() {
        let periods = vec![
            period(1, 0, Some("2025-09-01"), Some("2025-10-31")),
            period(2, 1, Some("2025-11-01"), Some("2026-01-15")),
        ];
        assert_eq!(period_for_date(&periods, day("2025-09-01")).unwrap().id, 1);
        assert_eq!(period_for_date(&periods, day("2025-10-31")).unwrap().id, 1);
        assert_eq!(period_for_date(&periods, day("2025-11-01")).unwrap().id, 2);
        assert!(period_for_date(&periods, day("2026-02-01")).is_none());
    }

    #[test]
    fn test_overlap_prefers_sort_order() {
        let periods = vec![
            period(5, 2, Some("2025-09-01"), Some("2025-12-31")),
            period(6, 1, Some("2025-10-01"), Some("2025-10-31")),
        ];
        assert_eq!(period_for_date(&periods, day("2025-10-10")).unwrap().id, 6);
    }

    #[test]
    fn test_undated_period_never_matches() {
        let periods = vec![period(1, 0, None, None)];
        assert!(period_for_date(&periods, day("2025-10-10")).is_none());
    }

    #[test]
    fn test_open_ended_period() {
        let periods = vec![period(1, 0, Some("2025-09-01"), None)];
        assert_eq!(period_for_date(&periods, day("2030-01-01")).unwrap().id, 1);
    }
}
