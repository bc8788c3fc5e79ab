use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RateLimit;
use crate::models::gradebook::requests::GradebookQuery;
use crate::services::GradebookService;
use crate::utils::{SafeClassIdI64, SafeStudentIdI64};

// 懒加载的全局 GradebookService 实例
static GRADEBOOK_SERVICE: Lazy<GradebookService> = Lazy::new(GradebookService::new_lazy);

// 班级成绩册（学生只看到自己）
pub async fn class_summary(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<GradebookQuery>,
) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE
        .class_summary(&req, class_id.0, query.into_inner())
        .await
}

// 学生成绩单
pub async fn student_report(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    student_id: SafeStudentIdI64,
    query: web::Query<GradebookQuery>,
) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE
        .student_report(&req, class_id.0, student_id.0, query.into_inner())
        .await
}

pub async fn class_stats(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<GradebookQuery>,
) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE
        .class_stats(&req, class_id.0, query.into_inner())
        .await
}

pub async fn export_csv(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<GradebookQuery>,
) -> ActixResult<HttpResponse> {
    GRADEBOOK_SERVICE
        .export_csv(&req, class_id.0, query.into_inner())
        .await
}

// 挂载在 /api/v1/classes/{class_id} 下
pub fn configure_gradebook_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/gradebook").route(web::get().to(class_summary)))
        .service(
            web::resource("/gradebook/students/{student_id}")
                .route(web::get().to(student_report)),
        )
        .service(web::resource("/gradebook/stats").route(web::get().to(class_stats)))
        .service(
            web::resource("/gradebook/export").route(
                web::get()
                    .to(export_csv)
                    .wrap(RateLimit::gradebook_export()),
            ),
        );
}
