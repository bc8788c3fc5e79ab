use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::grades::requests::{GradeListParams, UpsertGradeRequest};
use crate::services::GradeService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 GradeService 实例
static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn list_grades(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<GradeListParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_grades(&req, class_id.0, query.into_inner())
        .await
}

pub async fn upsert_grade(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<UpsertGradeRequest>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .upsert_grade(&req, class_id.0, body.into_inner())
        .await
}

pub async fn import_grades(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    payload: Multipart,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.import_grades(&req, class_id.0, payload).await
}

// 挂载在 /api/v1/classes/{class_id} 下
pub fn configure_grades_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/grades")
            .route(web::get().to(list_grades))
            .route(web::put().to(upsert_grade)),
    )
    .service(
        web::resource("/grades/import").route(
            web::post()
                .to(import_grades)
                // 导入开销较大，按用户限流
                .wrap(RateLimit::grade_import()),
        ),
    );
}
