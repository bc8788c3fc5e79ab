pub mod create;
pub mod delete;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::periods::requests::CreatePeriodRequest;
use crate::storage::Storage;

pub struct PeriodService {
    storage: Option<Arc<dyn Storage>>,
}

impl PeriodService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_periods(
        &self,
        request: &HttpRequest,
        class_id: i64,
    ) -> ActixResult<HttpResponse> {
        list::list_periods(self, request, class_id).await
    }

    pub async fn create_period(
        &self,
        request: &HttpRequest,
        class_id: i64,
        req: CreatePeriodRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_period(self, request, class_id, req).await
    }

    // 删除周期会一并删除其任务和成绩
    pub async fn delete_period(
        &self,
        request: &HttpRequest,
        class_id: i64,
        period_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_period(self, request, class_id, period_id).await
    }
}
