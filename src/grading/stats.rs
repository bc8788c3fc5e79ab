use std::cmp::Ordering;

use super::rounding::{round_grade, round_percentage};
use super::scale::LetterScale;
use crate::models::gradebook::entities::{GradeValue, StudentPeriodSummary, UNGRADED_SENTINEL};
use crate::models::gradebook::responses::{ClassStatsResponse, LetterBucket, PeriodMean};
use crate::models::periods::entities::Period;

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let n = sorted.len();
    if n % 2 == 1 {
        Some(sorted[n / 2])
    } else {
        Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0)
    }
}

/// 由成绩汇总计算班级统计
///
/// 字母分布包含等级制中的每一档（没有人也计 0）以及未评分人数。
pub fn class_stats(
    class_id: i64,
    summaries: &[StudentPeriodSummary],
    periods: &[Period],
    scale: &LetterScale,
) -> ClassStatsResponse {
    let finals: Vec<f64> = summaries
        .iter()
        .filter_map(|s| s.final_average.as_option())
        .collect();

    let highest = finals.iter().copied().reduce(f64::max);
    let lowest = finals.iter().copied().reduce(f64::min);

    let mut ordered: Vec<&Period> = periods.iter().collect();
    ordered.sort_by_key(|p| (p.sort_order, p.id));
    let period_means = ordered
        .into_iter()
        .map(|period| {
            let values: Vec<f64> = summaries
                .iter()
                .filter_map(|s| s.period_grades.get(&period.id).and_then(GradeValue::as_option))
                .collect();
            PeriodMean {
                period_id: period.id,
                name: period.name.clone(),
                mean: round_grade(mean(&values)),
            }
        })
        .collect();

    let mut distribution: Vec<LetterBucket> = scale
        .labels()
        .into_iter()
        .map(|label| LetterBucket {
            label: label.to_string(),
            count: 0,
        })
        .collect();
    for value in &finals {
        let letter = scale.classify(*value);
        if let Some(bucket) = distribution.iter_mut().find(|b| b.label == letter.as_str()) {
            bucket.count += 1;
        }
    }
    distribution.push(LetterBucket {
        label: UNGRADED_SENTINEL.to_string(),
        count: summaries.len() - finals.len(),
    });

    ClassStatsResponse {
        class_id,
        scale: scale.name().to_string(),
        student_count: summaries.len(),
        graded_count: finals.len(),
        ungraded_count: summaries.len() - finals.len(),
        mean: round_grade(mean(&finals)),
        median: round_grade(median(&finals)),
        highest: GradeValue::from(highest.map(round_percentage)),
        lowest: GradeValue::from(lowest.map(round_percentage)),
        period_means,
        distribution,
    }
}
