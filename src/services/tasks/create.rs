use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{TaskService, ensure_category_in_period};
use crate::errors::{GradebookError, Result};
use crate::grading::period_for_date;
use crate::models::{ApiResponse, tasks::requests::CreateTaskRequest};
use crate::services::{class_access, error_response, require_manager};
use crate::storage::Storage;
use crate::utils::validate::{validate_max_points, validate_name, validate_weight};

pub async fn create_task(
    service: &TaskService,
    request: &HttpRequest,
    class_id: i64,
    mut req: CreateTaskRequest,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    if let Err(e) = validate_task(&req) {
        return Ok(error_response(&e));
    }
    req.title = req.title.trim().to_string();

    let storage = service.get_storage(request)?;

    let period_id = match resolve_period(&storage, class_id, &req).await {
        Ok(period_id) => period_id,
        Err(e) => return Ok(error_response(&e)),
    };

    if let Some(category_id) = req.category_id
        && let Err(e) = ensure_category_in_period(&storage, class_id, period_id, category_id).await
    {
        return Ok(error_response(&e));
    }

    match storage.create_task(class_id, period_id, req).await {
        Ok(task) => {
            info!(
                "Task {} created in class {} period {} by user {}",
                task.id, class_id, period_id, access.user_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                task,
                "Task created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

fn validate_task(req: &CreateTaskRequest) -> Result<()> {
    validate_name("title", &req.title)?;
    validate_max_points(req.max_points)?;
    validate_weight("weight", req.weight)
}

/// 显式 period_id 优先，否则按截止日期查找所在周期
async fn resolve_period(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    req: &CreateTaskRequest,
) -> Result<i64> {
    if let Some(period_id) = req.period_id {
        return storage
            .get_period(class_id, period_id)
            .await?
            .map(|p| p.id)
            .ok_or_else(|| GradebookError::not_found(format!("period {period_id} not found")));
    }

    let due_date = req.due_date.ok_or_else(|| {
        GradebookError::validation("period_id is required when due_date is not given")
    })?;

    let periods = storage.list_periods(class_id).await?;
    period_for_date(&periods, due_date)
        .map(|p| p.id)
        .ok_or_else(|| {
            GradebookError::validation(format!("no period contains due date {due_date}"))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(max_points: f64, weight: f64) -> CreateTaskRequest {
        CreateTaskRequest {
            period_id: Some(1),
            category_id: None,
            title: "Quiz 1".to_string(),
            max_points,
            weight,
            due_date: None,
        }
    }

    #[test]
    fn test_validate_task() {
        assert!(validate_task(&request(20.0, 10.0)).is_ok());
        assert_eq!(validate_task(&request(0.0, 10.0)).unwrap_err().code(), "E101");
        assert_eq!(validate_task(&request(20.0, 101.0)).unwrap_err().code(), "E007");
    }
}
