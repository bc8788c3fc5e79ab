//! 成绩册 CSV 导出
//!
//! 列：`student_id,student_name,<各周期名称>,final,letter`，未评分写作 `Not graded`。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{error, info};

use super::summary::build_gradebook;
use super::{GradebookService, grading_settings, load_snapshot, resolve_scale};
use crate::errors::{GradebookError, Result};
use crate::models::gradebook::requests::GradebookQuery;
use crate::models::gradebook::responses::ClassGradebookResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{class_access, error_response, require_manager};

pub async fn export_csv(
    service: &GradebookService,
    request: &HttpRequest,
    class_id: i64,
    query: GradebookQuery,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

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

    let gradebook = build_gradebook(class_id, &snapshot, &scale, None);
    let data = match write_csv(&gradebook) {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to export gradebook for class {}: {}", class_id, e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExportFailed,
                format!("导出失败: {e}"),
            )));
        }
    };

    info!(
        "Exported gradebook for class {} ({} rows) by user {}",
        class_id,
        gradebook.rows.len(),
        access.user_id
    );

    let filename = format!("gradebook_class_{class_id}.csv");
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(data))
}

pub(crate) fn write_csv(gradebook: &ClassGradebookResponse) -> Result<Vec<u8>> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header = vec!["student_id".to_string(), "student_name".to_string()];
    header.extend(gradebook.periods.iter().map(|p| p.name.clone()));
    header.push("final".to_string());
    header.push("letter".to_string());
    wtr.write_record(&header)?;

    for row in &gradebook.rows {
        let mut record = vec![row.student_id.to_string(), row.student_name.clone()];
        for period in &gradebook.periods {
            let cell = row
                .period_grades
                .get(&period.id)
                .map(ToString::to_string)
                .unwrap_or_default();
            record.push(cell);
        }
        record.push(row.final_average.to_string());
        record.push(
            row.letter
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        );
        wtr.write_record(&record)?;
    }

    wtr.into_inner()
        .map_err(|e| GradebookError::csv_format(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::gradebook::entities::{GradeValue, LetterGrade};
    use crate::models::gradebook::responses::{GradebookRow, PeriodHeader};
    use std::collections::BTreeMap;

    #[test]
    fn test_write_csv() {
        let gradebook = ClassGradebookResponse {
            class_id: 1,
            scale: "simple".into(),
            periods: vec![
                PeriodHeader { id: 1, name: "Term 1".into(), weight: 50.0 },
                PeriodHeader { id: 2, name: "Term 2".into(), weight: 50.0 },
            ],
            rows: vec![
                GradebookRow {
                    student_id: 7,
                    student_name: "Lee, Ann".into(),
                    period_grades: BTreeMap::from([
                        (1, GradeValue::Graded(91.2)),
                        (2, GradeValue::Ungraded),
                    ]),
                    final_average: GradeValue::Graded(91.3),
                    letter: Some(LetterGrade("A".into())),
                },
                GradebookRow {
                    student_id: 8,
                    student_name: "Bo".into(),
                    period_grades: BTreeMap::from([
                        (1, GradeValue::Ungraded),
                        (2, GradeValue::Ungraded),
                    ]),
                    final_average: GradeValue::Ungraded,
                    letter: None,
                },
            ],
            diagnostics: vec![],
            demo_data: false,
        };

        let text = String::from_utf8(write_csv(&gradebook).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "student_id,student_name,Term 1,Term 2,final,letter");
        assert_eq!(lines[1], "7,\"Lee, Ann\",91.2,Not graded,91.3,A");
        assert_eq!(lines[2], "8,Bo,Not graded,Not graded,Not graded,");
    }
}
