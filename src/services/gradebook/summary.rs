use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::debug;

use super::{ClassSnapshot, GradebookService, grading_settings, load_snapshot, resolve_scale};
use crate::grading::{LetterScale, SummaryBuilder};
use crate::models::ApiResponse;
use crate::models::gradebook::requests::GradebookQuery;
use crate::models::gradebook::responses::{ClassGradebookResponse, GradebookRow, PeriodHeader};
use crate::services::{class_access, error_response};

/// 由班级数据生成成绩册
///
/// `only_student` 为 Some 时只保留该学生的一行。
pub(crate) fn build_gradebook(
    class_id: i64,
    snapshot: &ClassSnapshot,
    scale: &LetterScale,
    only_student: Option<i64>,
) -> ClassGradebookResponse {
    let builder = SummaryBuilder::new(&snapshot.periods, &snapshot.tasks_by_period)
        .with_categories(&snapshot.categories);

    let roster: Vec<_> = snapshot
        .roster
        .iter()
        .filter(|s| only_student.is_none_or(|id| s.id == id))
        .cloned()
        .collect();
    let grades: Vec<_> = match only_student {
        Some(id) => snapshot
            .grades
            .iter()
            .filter(|g| g.student_id == id)
            .cloned()
            .collect(),
        None => snapshot.grades.clone(),
    };
    let outcome = builder.build(&roster, &grades);

    let periods = builder
        .periods()
        .iter()
        .map(|p| PeriodHeader {
            id: p.id,
            name: p.name.clone(),
            weight: p.weight,
        })
        .collect();

    let rows = roster
        .iter()
        .zip(outcome.summaries)
        .map(|(student, summary)| GradebookRow {
            student_id: student.id,
            student_name: student.name.clone(),
            letter: scale.classify_value(summary.final_average),
            period_grades: summary.period_grades,
            final_average: summary.final_average,
        })
        .collect();

    ClassGradebookResponse {
        class_id,
        scale: scale.name().to_string(),
        periods,
        rows,
        diagnostics: outcome.diagnostics,
        demo_data: snapshot.demo_data,
    }
}

pub async fn class_summary(
    service: &GradebookService,
    request: &HttpRequest,
    class_id: i64,
    query: GradebookQuery,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };

    let grading = grading_settings(request);
    let scale = match resolve_scale(query.scale.as_deref(), &grading.class_scale) {
        Ok(scale) => scale,
        Err(e) => return Ok(error_response(&e)),
    };

    let storage = service.get_storage(request)?;
    let snapshot = match load_snapshot(&storage, class_id, grading.demo_fallback).await {
        Ok(snapshot) => snapshot,
        Err(e) => return Ok(error_response(&e)),
    };

    // 学生只能看到自己的一行，诊断信息只给教师
    let only_student = (!access.can_manage()).then_some(access.user_id);
    let mut gradebook = build_gradebook(class_id, &snapshot, &scale, only_student);
    if !access.can_manage() {
        gradebook.diagnostics.clear();
    }

    debug!(
        "Gradebook for class {}: {} rows, {} diagnostics",
        class_id,
        gradebook.rows.len(),
        gradebook.diagnostics.len()
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        gradebook,
        "Gradebook retrieved successfully",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gradebook::entities::{GradeValue, Student};
    use crate::models::grades::entities::Grade;
    use crate::models::periods::entities::Period;
    use crate::models::tasks::entities::Task;
    use crate::services::gradebook::group_by_period;

    fn period(id: i64, weight: f64, sort_order: i32) -> Period {
        Period {
            id,
            class_id: 1,
            name: format!("P{id}"),
            weight,
            start_date: None,
            end_date: None,
            sort_order,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn task(id: i64, period_id: i64, max_points: f64) -> Task {
        Task {
            id,
            class_id: 1,
            period_id,
            category_id: None,
            title: format!("T{id}"),
            max_points,
            weight: 1.0,
            due_date: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    fn grade(id: i64, student_id: i64, task_id: i64, score: Option<f64>) -> Grade {
        Grade {
            id,
            class_id: 1,
            student_id,
            task_id,
            score,
            grader_id: Some(100),
            comment: None,
            updated_at: chrono::Utc::now(),
        }
    }

    fn snapshot() -> ClassSnapshot {
        ClassSnapshot {
            roster: vec![
                Student { id: 1, name: "Ada".into() },
                Student { id: 2, name: "Bo".into() },
            ],
            periods: vec![period(20, 50.0, 2), period(10, 50.0, 1)],
            tasks_by_period: group_by_period(vec![task(1, 10, 20.0), task(2, 20, 10.0)]),
            categories: vec![],
            grades: vec![
                grade(1, 1, 1, Some(18.0)),
                grade(2, 1, 2, Some(7.0)),
                grade(3, 2, 99, Some(5.0)),
            ],
            demo_data: false,
        }
    }

    #[test]
    fn test_build_gradebook_rows() {
        let gradebook = build_gradebook(1, &snapshot(), &LetterScale::simple(), None);

        let header_ids: Vec<i64> = gradebook.periods.iter().map(|p| p.id).collect();
        assert_eq!(header_ids, vec![10, 20]);
        assert_eq!(gradebook.rows.len(), 2);

        let ada = &gradebook.rows[0];
        assert_eq!(ada.period_grades[&10], GradeValue::Graded(90.0));
        assert_eq!(ada.period_grades[&20], GradeValue::Graded(70.0));
        assert_eq!(ada.final_average, GradeValue::Graded(80.0));
        assert_eq!(ada.letter.as_ref().map(|l| l.as_str()), Some("B"));

        let bo = &gradebook.rows[1];
        assert_eq!(bo.final_average, GradeValue::Ungraded);
        assert!(bo.letter.is_none());

        // task 99 不存在
        assert_eq!(gradebook.diagnostics.len(), 1);
        assert_eq!(gradebook.diagnostics[0].task_id, 99);
    }

    #[test]
    fn test_build_gradebook_single_student() {
        let gradebook = build_gradebook(1, &snapshot(), &LetterScale::simple(), Some(1));
        assert_eq!(gradebook.rows.len(), 1);
        assert_eq!(gradebook.rows[0].student_id, 1);
        assert!(gradebook.diagnostics.is_empty());
    }
}
