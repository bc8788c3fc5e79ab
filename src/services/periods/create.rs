use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::PeriodService;
use crate::errors::Result;
use crate::models::{ApiResponse, periods::requests::CreatePeriodRequest};
use crate::services::{class_access, error_response, require_manager};
use crate::utils::validate::{validate_date_range, validate_name, validate_weight};

pub async fn create_period(
    service: &PeriodService,
    request: &HttpRequest,
    class_id: i64,
    mut req: CreatePeriodRequest,
) -> ActixResult<HttpResponse> {
    let access = match class_access(request) {
        Ok(access) => access,
        Err(resp) => return Ok(resp),
    };
    if let Err(resp) = require_manager(&access) {
        return Ok(resp);
    }

    if let Err(e) = validate_period(&req) {
        return Ok(error_response(&e));
    }
    req.name = req.name.trim().to_string();

    let storage = service.get_storage(request)?;
    match storage.create_period(class_id, req).await {
        Ok(period) => {
            info!(
                "Period {} created in class {} by user {}",
                period.id, class_id, access.user_id
            );
            Ok(HttpResponse::Created().json(ApiResponse::success(
                period,
                "Period created successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}

pub(crate) fn validate_period(req: &CreatePeriodRequest) -> Result<()> {
    validate_name("name", &req.name)?;
    validate_weight("weight", req.weight)?;
    validate_date_range(req.start_date, req.end_date)
}
