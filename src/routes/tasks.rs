use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::tasks::requests::{CreateTaskRequest, TaskListParams, UpdateTaskRequest};
use crate::services::TaskService;
use crate::utils::{SafeClassIdI64, SafeTaskIdI64};

// 懒加载的全局 TaskService 实例
static TASK_SERVICE: Lazy<TaskService> = Lazy::new(TaskService::new_lazy);

// 列出任务，可按周期过滤
pub async fn list_tasks(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    query: web::Query<TaskListParams>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE
        .list_tasks(&req, class_id.0, query.into_inner())
        .await
}

pub async fn create_task(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    body: web::Json<CreateTaskRequest>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE
        .create_task(&req, class_id.0, body.into_inner())
        .await
}

pub async fn update_task(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    task_id: SafeTaskIdI64,
    body: web::Json<UpdateTaskRequest>,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE
        .update_task(&req, class_id.0, task_id.0, body.into_inner())
        .await
}

pub async fn delete_task(
    req: HttpRequest,
    class_id: SafeClassIdI64,
    task_id: SafeTaskIdI64,
) -> ActixResult<HttpResponse> {
    TASK_SERVICE.delete_task(&req, class_id.0, task_id.0).await
}

// 挂载在 /api/v1/classes/{class_id} 下
pub fn configure_tasks_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/tasks")
            .route(web::get().to(list_tasks))
            .route(web::post().to(create_task)),
    )
    .service(
        web::resource("/tasks/{task_id}")
            .route(web::put().to(update_task))
            .route(web::delete().to(delete_task)),
    );
}
