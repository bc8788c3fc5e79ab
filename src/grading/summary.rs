use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::aggregate::{WeightedItem, aggregate};
use super::normalize::normalize;
use super::rounding::round_grade;
use crate::errors::GradebookError;
use crate::models::categories::entities::Category;
use crate::models::gradebook::entities::{
    DiagnosticKind, Student, StudentPeriodSummary, SummaryDiagnostic,
};
use crate::models::grades::entities::Grade;
use crate::models::periods::entities::Period;
use crate::models::tasks::entities::Task;

/// 汇总结果及被跳过的记录
#[derive(Debug, Clone, Default)]
pub struct SummaryOutcome {
    pub summaries: Vec<StudentPeriodSummary>,
    pub diagnostics: Vec<SummaryDiagnostic>,
}

/// 单个任务的计算结果
#[derive(Debug, Clone)]
pub(crate) struct TaskEvaluation<'a> {
    pub task: &'a Task,
    pub score: Option<f64>,
    pub fraction: Option<f64>,
}

/// 单个学生在单个周期内的计算结果，百分比均未取整
#[derive(Debug, Clone)]
pub(crate) struct PeriodEvaluation<'a> {
    pub percentage: Option<f64>,
    pub categories: Vec<(&'a Category, Option<f64>)>,
    pub tasks: Vec<TaskEvaluation<'a>>,
}

pub(crate) type GradeIndex<'g> = HashMap<(i64, i64), &'g Grade>;

/// 成绩汇总
///
/// 周期内先按类别汇总任务，再把类别和未分类任务一起汇总为周期成绩；
/// 总评按周期权重汇总，所有周期都没有正权重时每个周期按 1 计。
pub struct SummaryBuilder<'a> {
    periods: Vec<&'a Period>,
    tasks_by_period: &'a HashMap<i64, Vec<Task>>,
    categories: HashMap<i64, &'a Category>,
}

impl<'a> SummaryBuilder<'a> {
    pub fn new(periods: &'a [Period], tasks_by_period: &'a HashMap<i64, Vec<Task>>) -> Self {
        let mut periods: Vec<&Period> = periods.iter().collect();
        periods.sort_by_key(|p| (p.sort_order, p.id));
        Self {
            periods,
            tasks_by_period,
            categories: HashMap::new(),
        }
    }

    pub fn with_categories(mut self, categories: &'a [Category]) -> Self {
        self.categories = categories.iter().map(|c| (c.id, c)).collect();
        self
    }

    /// 已按 sort_order 排好序的周期
    pub fn periods(&self) -> &[&'a Period] {
        &self.periods
    }

    pub fn build(&self, roster: &[Student], grades: &[Grade]) -> SummaryOutcome {
        let index = grade_index(grades);
        let mut diagnostics = self.orphan_grades(grades);

        let mut summaries = Vec::with_capacity(roster.len());
        for student in roster {
            let mut period_percentages = Vec::with_capacity(self.periods.len());
            for period in self.periods.iter().copied() {
                let evaluation = self.evaluate_period(student.id, period, &index, &mut diagnostics);
                period_percentages.push((period, evaluation.percentage));
            }

            summaries.push(StudentPeriodSummary {
                student_id: student.id,
                period_grades: period_percentages
                    .iter()
                    .map(|(p, pct)| (p.id, round_grade(*pct)))
                    .collect(),
                final_average: round_grade(self.final_average(&period_percentages)),
            });
        }

        SummaryOutcome {
            summaries,
            diagnostics,
        }
    }

    /// 找出引用了不存在任务的成绩
    pub(crate) fn orphan_grades(&self, grades: &[Grade]) -> Vec<SummaryDiagnostic> {
        let known: HashSet<i64> = self
            .tasks_by_period
            .values()
            .flatten()
            .map(|t| t.id)
            .collect();

        grades
            .iter()
            .filter(|g| !known.contains(&g.task_id))
            .map(|g| {
                let err = GradebookError::orphan_grade_reference(format!(
                    "成绩 {} 引用的任务 {} 不存在",
                    g.id, g.task_id
                ));
                diagnostic(
                    DiagnosticKind::OrphanGradeReference,
                    g.student_id,
                    g.task_id,
                    Some(g.id),
                    &err,
                )
            })
            .collect()
    }

    pub(crate) fn evaluate_period<'g>(
        &self,
        student_id: i64,
        period: &'a Period,
        index: &GradeIndex<'g>,
        diagnostics: &mut Vec<SummaryDiagnostic>,
    ) -> PeriodEvaluation<'a> {
        let mut period_categories: Vec<&'a Category> = self
            .categories
            .values()
            .filter(|c| c.period_id == period.id)
            .copied()
            .collect();
        period_categories.sort_by_key(|c| c.id);

        let mut direct: Vec<WeightedItem> = Vec::new();
        let mut by_category: HashMap<i64, Vec<WeightedItem>> = HashMap::new();
        let mut tasks = Vec::new();

        let period_tasks = self
            .tasks_by_period
            .get(&period.id)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for task in period_tasks {
            let grade = index.get(&(student_id, task.id)).copied();
            let score = grade.and_then(|g| g.score);
            let fraction = match normalize(score, task.max_points) {
                Ok(fraction) => fraction,
                Err(err) => {
                    diagnostics.push(diagnostic(
                        DiagnosticKind::InvalidTaskDefinition,
                        student_id,
                        task.id,
                        grade.map(|g| g.id),
                        &err,
                    ));
                    None
                }
            };

            let item = WeightedItem::new(fraction, task.weight);
            // 类别不存在或不属于本周期时按未分类处理
            match task
                .category_id
                .filter(|id| period_categories.iter().any(|c| c.id == *id))
            {
                Some(category_id) => by_category.entry(category_id).or_default().push(item),
                None => direct.push(item),
            }

            tasks.push(TaskEvaluation {
                task,
                score,
                fraction,
            });
        }

        let categories: Vec<(&'a Category, Option<f64>)> = period_categories
            .into_iter()
            .map(|c| (c, aggregate(by_category.get(&c.id).into_iter().flatten())))
            .collect();

        let percentage = aggregate(
            categories
                .iter()
                .map(|(c, pct)| WeightedItem::from_percentage(*pct, c.weight))
                .chain(direct),
        );

        PeriodEvaluation {
            percentage,
            categories,
            tasks,
        }
    }

    /// 由未取整的周期成绩计算总评
    pub(crate) fn final_average(&self, period_percentages: &[(&Period, Option<f64>)]) -> Option<f64> {
        let weighted = self.periods.iter().any(|p| p.weight > 0.0);
        aggregate(period_percentages.iter().map(|(period, pct)| {
            WeightedItem::from_percentage(*pct, if weighted { period.weight } else { 1.0 })
        }))
    }
}

pub(crate) fn grade_index(grades: &[Grade]) -> GradeIndex<'_> {
    grades.iter().map(|g| ((g.student_id, g.task_id), g)).collect()
}

fn diagnostic(
    kind: DiagnosticKind,
    student_id: i64,
    task_id: i64,
    grade_id: Option<i64>,
    err: &GradebookError,
) -> SummaryDiagnostic {
    warn!(
        target: super::DIAGNOSTICS_TARGET,
        kind = %kind,
        student_id,
        task_id,
        grade_id,
        "Skipped grade record: {}",
        err
    );
    SummaryDiagnostic {
        kind,
        student_id,
        task_id,
        grade_id,
        message: err.message().to_string(),
    }
}

/// 计算名单中每个学生的周期成绩和总评（不含类别层）
pub fn build_summary(
    roster: &[Student],
    periods: &[Period],
    tasks_by_period: &HashMap<i64, Vec<Task>>,
    grades: &[Grade],
) -> Vec<StudentPeriodSummary> {
    SummaryBuilder::new(periods, tasks_by_period)
        .build(roster, grades)
        .summaries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::test_support::*;
    use crate::models::gradebook::entities::GradeValue;

    fn by_period(tasks: Vec<Task>) -> HashMap<i64, Vec<Task>> {
        let mut map: HashMap<i64, Vec<Task>> = HashMap::new();
        for t in tasks {
            map.entry(t.period_id).or_default().push(t);
        }
        map
    }

    #[test]
    fn test_ungraded_task_excluded_from_denominator() {
        let periods = vec![period(1, 100.0, 0)];
        let tasks = by_period(vec![task(1, 1, 20.0, 10.0), task(2, 1, 100.0, 30.0)]);
        let grades = vec![grade(1, 7, 1, Some(18.0)), grade(2, 7, 2, None)];

        let summary = build_summary(&[student(7, "Ann")], &periods, &tasks, &grades);
        assert_eq!(summary[0].period_grades[&1], GradeValue::Graded(90.0));
        assert_eq!(summary[0].final_average, GradeValue::Graded(90.0));
    }

    #[test]
    fn test_ungraded_task_excluded_within_category() {
        let periods = vec![period(1, 100.0, 0)];
        let categories = vec![category(10, 1, 100.0)];
        let tasks = by_period(vec![
            categorized(task(1, 1, 20.0, 10.0), 10),
            categorized(task(2, 1, 100.0, 30.0), 10),
        ]);
        let grades = vec![grade(1, 7, 1, Some(18.0))];

        let builder = SummaryBuilder::new(&periods, &tasks).with_categories(&categories);
        let outcome = builder.build(&[student(7, "Ann")], &grades);
        assert_eq!(outcome.summaries[0].period_grades[&1], GradeValue::Graded(90.0));
        assert!(outcome.diagnostics.is_empty());
    }

    #[test]
    fn test_five_tasks_three_present() {
        let periods = vec![period(1, 100.0, 0)];
        let tasks = by_period(vec![
            task(1, 1, 20.0, 20.0),
            task(2, 1, 50.0, 20.0),
            task(3, 1, 40.0, 20.0),
            task(4, 1, 100.0, 20.0),
            task(5, 1, 10.0, 20.0),
        ]);
        let grades = vec![
            grade(1, 7, 1, Some(18.0)),
            grade(2, 7, 2, Some(45.0)),
            grade(3, 7, 3, None),
            grade(4, 7, 4, Some(92.0)),
        ];

        let summary = build_summary(&[student(7, "Ann")], &periods, &tasks, &grades);
        // (0.9 + 0.9 + 0.92) × 20 / 60
        assert_eq!(summary[0].period_grades[&1], GradeValue::Graded(90.7));
    }

    #[test]
    fn test_orphan_grade_skipped() {
        let periods = vec![period(1, 100.0, 0)];
        let tasks = by_period(vec![task(1, 1, 10.0, 50.0)]);
        let grades = vec![grade(1, 7, 1, Some(8.0)), grade(2, 7, 999, Some(0.0))];

        let builder = SummaryBuilder::new(&periods, &tasks);
        let outcome = builder.build(&[student(7, "Ann")], &grades);

        assert_eq!(outcome.summaries[0].period_grades[&1], GradeValue::Graded(80.0));
        assert_eq!(outcome.diagnostics.len(), 1);
        let diag = &outcome.diagnostics[0];
        assert_eq!(diag.kind, DiagnosticKind::OrphanGradeReference);
        assert_eq!(diag.task_id, 999);
        assert_eq!(diag.grade_id, Some(2));
    }

    #[test]
    fn test_invalid_task_only_drops_that_pair() {
        let periods = vec![period(1, 100.0, 0)];
        let tasks = by_period(vec![task(1, 1, 0.0, 50.0), task(2, 1, 10.0, 50.0)]);
        let grades = vec![
            grade(1, 7, 1, Some(5.0)),
            grade(2, 7, 2, Some(7.0)),
            grade(3, 8, 2, Some(9.0)),
        ];

        let builder = SummaryBuilder::new(&periods, &tasks);
        let outcome = builder.build(&[student(7, "Ann"), student(8, "Ben")], &grades);

        assert_eq!(outcome.summaries[0].period_grades[&1], GradeValue::Graded(70.0));
        assert_eq!(outcome.summaries[1].period_grades[&1], GradeValue::Graded(90.0));
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::InvalidTaskDefinition);
        assert_eq!(outcome.diagnostics[0].student_id, 7);
    }

    #[test]
    fn test_student_without_grades_is_ungraded() {
        let periods = vec![period(1, 50.0, 0), period(2, 50.0, 1)];
        let tasks = by_period(vec![task(1, 1, 10.0, 1.0), task(2, 2, 10.0, 1.0)]);

        let summary = build_summary(&[student(7, "Ann")], &periods, &tasks, &[]);
        assert_eq!(summary[0].period_grades[&1], GradeValue::Ungraded);
        assert_eq!(summary[0].period_grades[&2], GradeValue::Ungraded);
        assert_eq!(summary[0].final_average, GradeValue::Ungraded);
    }

    #[test]
    fn test_final_uses_period_weights() {
        let periods = vec![period(1, 40.0, 0), period(2, 60.0, 1)];
        let tasks = by_period(vec![task(1, 1, 100.0, 1.0), task(2, 2, 100.0, 1.0)]);
        let grades = vec![grade(1, 7, 1, Some(80.0)), grade(2, 7, 2, Some(90.0))];

        let summary = build_summary(&[student(7, "Ann")], &periods, &tasks, &grades);
        assert_eq!(summary[0].final_average, GradeValue::Graded(86.0));
    }

    #[test]
    fn test_final_unweighted_when_no_period_weights() {
        let periods = vec![period(1, 0.0, 0), period(2, 0.0, 1)];
        let tasks = by_period(vec![task(1, 1, 100.0, 1.0), task(2, 2, 100.0, 1.0)]);
        let grades = vec![grade(1, 7, 1, Some(80.0)), grade(2, 7, 2, Some(90.0))];

        let summary = build_summary(&[student(7, "Ann")], &periods, &tasks, &grades);
        assert_eq!(summary[0].final_average, GradeValue::Graded(85.0));
    }

    #[test]
    fn test_final_skips_ungraded_periods() {
        let periods = vec![period(1, 40.0, 0), period(2, 60.0, 1)];
        let tasks = by_period(vec![task(1, 1, 100.0, 1.0), task(2, 2, 100.0, 1.0)]);
        let grades = vec![grade(1, 7, 1, Some(75.0))];

        let summary = build_summary(&[student(7, "Ann")], &periods, &tasks, &grades);
        assert_eq!(summary[0].period_grades[&2], GradeValue::Ungraded);
        assert_eq!(summary[0].final_average, GradeValue::Graded(75.0));
    }

    #[test]
    fn test_categories_and_loose_tasks_mix() {
        let periods = vec![period(1, 100.0, 0)];
        let categories = vec![category(10, 1, 40.0), category(11, 1, 60.0)];
        let tasks = by_period(vec![
            categorized(task(1, 1, 10.0, 1.0), 10),
            categorized(task(2, 1, 10.0, 1.0), 10),
            categorized(task(3, 1, 100.0, 1.0), 11),
            task(4, 1, 5.0, 20.0),
        ]);
        let grades = vec![
            grade(1, 7, 1, Some(10.0)),
            grade(2, 7, 2, Some(5.0)),
            grade(3, 7, 3, Some(90.0)),
            grade(4, 7, 4, Some(5.0)),
        ];

        let builder = SummaryBuilder::new(&periods, &tasks).with_categories(&categories);
        let outcome = builder.build(&[student(7, "Ann")], &grades);
        // (0.75 × 40 + 0.9 × 60 + 1.0 × 20) / 120
        assert_eq!(outcome.summaries[0].period_grades[&1], GradeValue::Graded(86.7));
    }

    #[test]
    fn test_unknown_category_treated_as_uncategorized() {
        let periods = vec![period(1, 100.0, 0)];
        let categories = vec![category(10, 1, 100.0)];
        let tasks = by_period(vec![
            categorized(task(1, 1, 10.0, 50.0), 10),
            categorized(task(2, 1, 10.0, 50.0), 77),
        ]);
        let grades = vec![grade(1, 7, 1, Some(10.0)), grade(2, 7, 2, Some(5.0))];

        let builder = SummaryBuilder::new(&periods, &tasks).with_categories(&categories);
        let outcome = builder.build(&[student(7, "Ann")], &grades);
        // 类别 10 = 100% (权重 100)，任务 2 = 50% (权重 50)
        assert_eq!(outcome.summaries[0].period_grades[&1], GradeValue::Graded(83.3));
    }

    #[test]
    fn test_grades_of_other_students_ignored() {
        let periods = vec![period(1, 100.0, 0)];
        let tasks = by_period(vec![task(1, 1, 10.0, 1.0)]);
        let grades = vec![grade(1, 8, 1, Some(2.0))];

        let summary = build_summary(&[student(7, "Ann")], &periods, &tasks, &grades);
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].final_average, GradeValue::Ungraded);
    }

    #[test]
    fn test_summary_is_repeatable() {
        let periods = vec![period(1, 30.0, 0), period(2, 70.0, 1)];
        let tasks = by_period(vec![task(1, 1, 15.0, 2.0), task(2, 2, 40.0, 3.0)]);
        let grades = vec![grade(1, 7, 1, Some(11.0)), grade(2, 7, 2, Some(33.0))];
        let roster = [student(7, "Ann")];

        let first = build_summary(&roster, &periods, &tasks, &grades);
        let second = build_summary(&roster, &periods, &tasks, &grades);
        assert_eq!(first, second);
    }
}
