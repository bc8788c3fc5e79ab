use std::collections::HashMap;

use super::rounding::round_grade;
use super::scale::LetterScale;
use super::summary::{SummaryBuilder, grade_index};
use crate::models::categories::entities::Category;
use crate::models::gradebook::entities::{GradeValue, LetterGrade, Student, SummaryDiagnostic};
use crate::models::gradebook::responses::{CategoryReport, PeriodReport, TaskReport};
use crate::models::grades::entities::Grade;
use crate::models::periods::entities::Period;
use crate::models::tasks::entities::Task;

/// 单个学生的成绩明细
#[derive(Debug, Clone, PartialEq)]
pub struct StudentReport {
    pub periods: Vec<PeriodReport>,
    pub final_average: GradeValue,
    pub letter: Option<LetterGrade>,
    pub diagnostics: Vec<SummaryDiagnostic>,
}

/// 生成学生成绩单：每个周期的成绩、类别成绩、任务得分率和总评
///
/// 字母成绩按取整后的百分比判定，与显示的数字保持一致。
pub fn build_student_report(
    student: &Student,
    periods: &[Period],
    tasks_by_period: &HashMap<i64, Vec<Task>>,
    categories: &[Category],
    grades: &[Grade],
    scale: &LetterScale,
) -> StudentReport {
    let builder = SummaryBuilder::new(periods, tasks_by_period).with_categories(categories);

    let own_grades: Vec<Grade> = grades
        .iter()
        .filter(|g| g.student_id == student.id)
        .cloned()
        .collect();
    let index = grade_index(&own_grades);
    let mut diagnostics = builder.orphan_grades(&own_grades);

    let mut reports = Vec::with_capacity(builder.periods().len());
    let mut period_percentages = Vec::with_capacity(builder.periods().len());

    for period in builder.periods().iter().copied() {
        let evaluation = builder.evaluate_period(student.id, period, &index, &mut diagnostics);
        period_percentages.push((period, evaluation.percentage));

        let tasks: Vec<TaskReport> = evaluation
            .tasks
            .iter()
            .map(|t| TaskReport {
                task_id: t.task.id,
                title: t.task.title.clone(),
                category_id: t.task.category_id,
                max_points: t.task.max_points,
                weight: t.task.weight,
                score: t.score,
                percentage: round_grade(t.fraction.map(|f| f * 100.0)),
            })
            .collect();
        let graded_count = evaluation.tasks.iter().filter(|t| t.fraction.is_some()).count();

        let percentage = round_grade(evaluation.percentage);
        reports.push(PeriodReport {
            period_id: period.id,
            name: period.name.clone(),
            weight: period.weight,
            percentage,
            letter: scale.classify_value(percentage),
            categories: evaluation
                .categories
                .iter()
                .map(|(c, pct)| CategoryReport {
                    category_id: c.id,
                    name: c.name.clone(),
                    weight: c.weight,
                    percentage: round_grade(*pct),
                })
                .collect(),
            ungraded_count: tasks.len() - graded_count,
            graded_count,
            tasks,
        });
    }

    let final_average = round_grade(builder.final_average(&period_percentages));
    StudentReport {
        periods: reports,
        final_average,
        letter: scale.classify_value(final_average),
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::test_support::*;
    use crate::models::gradebook::entities::DiagnosticKind;

    fn fixture() -> (Vec<Period>, HashMap<i64, Vec<Task>>, Vec<Category>) {
        let periods = vec![period(2, 60.0, 1), period(1, 40.0, 0)];
        let categories = vec![category(10, 1, 50.0), category(11, 1, 50.0)];
        let mut tasks = HashMap::new();
        tasks.insert(
            1,
            vec![
                categorized(task(1, 1, 20.0, 1.0), 10),
                categorized(task(2, 1, 20.0, 1.0), 10),
                categorized(task(3, 1, 50.0, 1.0), 11),
            ],
        );
        tasks.insert(2, vec![task(4, 2, 100.0, 1.0)]);
        (periods, tasks, categories)
    }

    #[test]
    fn test_report_breakdown() {
        let (periods, tasks, categories) = fixture();
        let grades = vec![
            grade(1, 7, 1, Some(19.0)),
            grade(2, 7, 2, None),
            grade(3, 7, 3, Some(40.0)),
            grade(4, 7, 4, Some(88.0)),
        ];

        let report = build_student_report(
            &student(7, "Ann"),
            &periods,
            &tasks,
            &categories,
            &grades,
            &LetterScale::plus_minus(),
        );

        // 按 sort_order 排序
        assert_eq!(report.periods[0].period_id, 1);
        assert_eq!(report.periods[1].period_id, 2);

        let first = &report.periods[0];
        assert_eq!(first.categories[0].percentage, GradeValue::Graded(95.0));
        assert_eq!(first.categories[1].percentage, GradeValue::Graded(80.0));
        assert_eq!(first.percentage, GradeValue::Graded(87.5));
        assert_eq!(first.letter, Some(LetterGrade("B+".to_string())));
        assert_eq!(first.graded_count, 2);
        assert_eq!(first.ungraded_count, 1);
        assert_eq!(first.tasks[1].percentage, GradeValue::Ungraded);
        assert_eq!(first.tasks[1].score, None);

        // 0.875 × 40 + 0.88 × 60 = 87.8
        assert_eq!(report.final_average, GradeValue::Graded(87.8));
        assert_eq!(report.letter, Some(LetterGrade("B+".to_string())));
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn test_report_without_grades() {
        let (periods, tasks, categories) = fixture();
        let report = build_student_report(
            &student(7, "Ann"),
            &periods,
            &tasks,
            &categories,
            &[],
            &LetterScale::plus_minus(),
        );
        assert_eq!(report.final_average, GradeValue::Ungraded);
        assert_eq!(report.letter, None);
        assert!(report.periods.iter().all(|p| p.letter.is_none()));
        assert_eq!(report.periods[0].ungraded_count, 3);
    }

    #[test]
    fn test_report_only_reports_own_orphans() {
        let (periods, tasks, categories) = fixture();
        let grades = vec![grade(1, 7, 404, Some(1.0)), grade(2, 8, 405, Some(1.0))];
        let report = build_student_report(
            &student(7, "Ann"),
            &periods,
            &tasks,
            &categories,
            &grades,
            &LetterScale::simple(),
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::OrphanGradeReference);
        assert_eq!(report.diagnostics[0].task_id, 404);
    }

    #[test]
    fn test_extra_credit_task_percentage_clamped_for_display() {
        let periods = vec![period(1, 100.0, 0)];
        let mut tasks = HashMap::new();
        tasks.insert(1, vec![task(1, 1, 10.0, 1.0), task(2, 1, 10.0, 1.0)]);
        let grades = vec![grade(1, 7, 1, Some(12.0)), grade(2, 7, 2, Some(6.0))];

        let report = build_student_report(
            &student(7, "Ann"),
            &periods,
            &tasks,
            &[],
            &grades,
            &LetterScale::simple(),
        );
        assert_eq!(report.periods[0].tasks[0].percentage, GradeValue::Graded(100.0));
        // 附加分参与计算：(1.2 + 0.6) / 2
        assert_eq!(report.periods[0].percentage, GradeValue::Graded(90.0));
    }
}
