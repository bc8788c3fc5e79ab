use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{TaskService, ensure_category_in_period};
use crate::errors::Result;
use crate::models::{ApiResponse, ErrorCode, tasks::requests::UpdateTaskRequest};
use crate::services::{class_access, error_response, require_manager};
use crate::utils::validate::{validate_max_points, validate_name, validate_weight};

pub async fn update_task(
    service: &TaskService,
    request: &HttpRequest,
    class_id: i64,
    task_id: i64,
    mut update: UpdateTaskRequest,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    if let Err(e) = validate_update(&update) {
        return Ok(error_response(&e));
    }
    update.title = update.title.map(|t| t.trim().to_string());

    let storage = service.get_storage(request)?;

    let task = match storage.get_task(class_id, task_id).await {
        Ok(Some(task)) => task,
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::TaskNotFound,
                "Task not found",
            )));
        }
        Err(e) => return Ok(error_response(&e)),
    };

    if let Some(category_id) = update.category_id
        && let Err(e) =
            ensure_category_in_period(&storage, class_id, task.period_id, category_id).await
    {
        return Ok(error_response(&e));
    }

    match storage.update_task(class_id, task_id, update).await {
        Ok(Some(task)) => {
            info!(
                "Task {} in class {} updated by user {}",
                task.id, class_id, access.user_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(task, "Task updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::TaskNotFound,
            "Task not found",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}

fn validate_update(update: &UpdateTaskRequest) -> Result<()> {
    if let Some(title) = &update.title {
        validate_name("title", title)?;
    }
    if let Some(max_points) = update.max_points {
        validate_max_points(max_points)?;
    }
    if let Some(weight) = update.weight {
        validate_weight("weight", weight)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_update_only_checks_given_fields() {
        assert!(validate_update(&UpdateTaskRequest::default()).is_ok());
        let bad = UpdateTaskRequest {
            max_points: Some(-5.0),
            ..Default::default()
        };
        assert_eq!(validate_update(&bad).unwrap_err().code(), "E101");
    }
}
