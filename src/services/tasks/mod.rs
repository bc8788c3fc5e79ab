pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{GradebookError, Result};
use crate::models::tasks::requests::{CreateTaskRequest, TaskListParams, UpdateTaskRequest};
use crate::storage::Storage;

pub struct TaskService {
    storage: Option<Arc<dyn Storage>>,
}

impl TaskService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_tasks(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: TaskListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_tasks(self, request, class_id, query).await
    }

    // 未指定周期时按截止日期归档
    pub async fn create_task(
        &self,
        request: &HttpRequest,
        class_id: i64,
        req: CreateTaskRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_task(self, request, class_id, req).await
    }

    pub async fn update_task(
        &self,
        request: &HttpRequest,
        class_id: i64,
        task_id: i64,
        update: UpdateTaskRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_task(self, request, class_id, task_id, update).await
    }

    // 删除任务会一并删除其成绩
    pub async fn delete_task(
        &self,
        request: &HttpRequest,
        class_id: i64,
        task_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_task(self, request, class_id, task_id).await
    }
}

/// 类别必须存在且与任务属于同一周期
pub(crate) async fn ensure_category_in_period(
    storage: &Arc<dyn Storage>,
    class_id: i64,
    period_id: i64,
    category_id: i64,
) -> Result<()> {
    match storage.get_category(class_id, category_id).await? {
        Some(category) if category.period_id == period_id => Ok(()),
        Some(category) => Err(GradebookError::validation(format!(
            "category {} belongs to period {}, not period {}",
            category_id, category.period_id, period_id
        ))),
        None => Err(GradebookError::not_found(format!(
            "category {category_id} not found"
        ))),
    }
}
