use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use super::{categories, gradebook, grades, periods, tasks};
use crate::middlewares;
use crate::models::class_users::entities::ClassUserRole;
use crate::models::class_users::requests::ClassUserListParams;
use crate::models::classes::requests::ClassQueryParams;
use crate::services::ClassService;
use crate::utils::SafeClassIdI64;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn get_class(req: HttpRequest, _class_id: SafeClassIdI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req).await
}

pub async fn list_students(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<ClassUserListParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .list_students(&req, class_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            // 管理员查询所有班级，教师查询自己的班级，学生查询加入的班级
            .service(web::resource("").route(web::get().to(list_classes)))
            .service(
                // 班级内的所有接口先解析班级身份，具体的写权限在业务层检查
                web::scope("/{class_id}")
                    .wrap(middlewares::RequireClassRole::new_any(
                        ClassUserRole::all_roles(),
                    ))
                    .service(web::resource("").route(web::get().to(get_class)))
                    .service(web::resource("/students").route(web::get().to(list_students)))
                    .configure(periods::configure_periods_routes)
                    .configure(categories::configure_categories_routes)
                    .configure(tasks::configure_tasks_routes)
                    .configure(grades::configure_grades_routes)
                    .configure(gradebook::configure_gradebook_routes),
            ),
    );
}
