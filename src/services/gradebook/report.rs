use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradebookService, grading_settings, load_snapshot, resolve_scale};
use crate::grading::build_student_report;
use crate::models::gradebook::requests::GradebookQuery;
use crate::models::gradebook::responses::StudentReportResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{class_access, error_response};

pub async fn student_report(
    service: &GradebookService,
    request: &HttpRequest,
    class_id: i64,
    student_id: i64,
    query: GradebookQuery,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };

    // 学生只能查看自己的成绩单
    if !access.can_view_student(student_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::ClassPermissionDenied,
            "You can only view your own report",
        )));
    }

    let grading = grading_settings(request);
    let scale = match resolve_scale(query.scale.as_deref(), &grading.report_scale) {
        Ok(scale) => scale,
        Err(e) => return Ok(error_response(&e)),
    };

    let storage = service.get_storage(request)?;
    let snapshot = match load_snapshot(&storage, class_id, grading.demo_fallback).await {
        Ok(snapshot) => snapshot,
        Err(e) => return Ok(error_response(&e)),
    };

    let Some(student) = snapshot.roster.iter().find(|s| s.id == student_id) else {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::StudentNotInClass,
            "Student is not enrolled in this class",
        )));
    };

    let report = build_student_report(
        student,
        &snapshot.periods,
        &snapshot.tasks_by_period,
        &snapshot.categories,
        &snapshot.grades,
        &scale,
    );

    let response = StudentReportResponse {
        class_id,
        student_id: student.id,
        student_name: student.name.clone(),
        scale: scale.name().to_string(),
        periods: report.periods,
        final_average: report.final_average,
        letter: report.letter,
        diagnostics: if access.can_manage() {
            report.diagnostics
        } else {
            Vec::new()
        },
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Report retrieved successfully",
    )))
}
