use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradebookService, grading_settings, load_snapshot, resolve_scale};
use crate::grading::{SummaryBuilder, class_stats as compute_stats};
use crate::models::ApiResponse;
use crate::models::gradebook::requests::GradebookQuery;
use crate::services::{class_access, error_response, require_manager};

pub async fn class_stats(
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

    let outcome = SummaryBuilder::new(&snapshot.periods, &snapshot.tasks_by_period)
        .with_categories(&snapshot.categories)
        .build(&snapshot.roster, &snapshot.grades);
    let stats = compute_stats(class_id, &outcome.summaries, &snapshot.periods, &scale);

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        stats,
        "Class statistics retrieved successfully",
    )))
}
