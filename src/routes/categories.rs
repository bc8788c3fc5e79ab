use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::categories::requests::{CategoryListParams, CreateCategoryRequest};
use crate::services::CategoryService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 CategoryService 实例
static CATEGORY_SERVICE: Lazy<CategoryService> = Lazy::new(CategoryService::new_lazy);

pub async fn list_categories(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<CategoryListParams>,
) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE
        .list_categories(&req, class_id.0, query.into_inner())
        .await
}

pub async fn create_category(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    CATEGORY_SERVICE
        .create_category(&req, class_id.0, body.into_inner())
        .await
}

// 挂载在 /api/v1/classes/{class_id} 下
pub fn configure_categories_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/categories")
            .route(web::get().to(list_categories))
            .route(web::post().to(create_category)),
    );
}
