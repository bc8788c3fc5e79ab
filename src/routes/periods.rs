use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::periods::requests::CreatePeriodRequest;
use crate::services::PeriodService;
use crate::utils::{SafeClassIdI64, SafePeriodIdI64};

// 懒加载的全局 PeriodService 实例
static PERIOD_SERVICE: Lazy<PeriodService> = Lazy::new(PeriodService::new_lazy);

pub async fn list_periods(req: HttpRequest, class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE.list_periods(&req, class_id.0).await
}

pub async fn create_period(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<CreatePeriodRequest>,
) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE
        .create_period(&req, class_id.0, body.into_inner())
        .await
}

pub async fn delete_period(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    period_id: SafePeriodIdI64,
) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE
        .delete_period(&req, class_id.0, period_id.0)
        .await
}

// 挂载在 /api/v1/classes/{class_id} 下
pub fn configure_periods_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/periods")
            .route(web::get().to(list_periods))
            .route(web::post().to(create_period)),
    )
    .service(web::resource("/periods/{period_id}").route(web::delete().to(delete_period)));
}
