use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PeriodService;
use crate::models::{ApiResponse, periods::responses::PeriodListResponse};
use crate::services::error_response;

pub async fn list_periods(
    service: &PeriodService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    match storage.list_periods(class_id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PeriodListResponse { items },
            "Periods retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
