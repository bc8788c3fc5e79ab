pub mod import;
pub mod list;
pub mod upsert;

use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::{GradeListParams, UpsertGradeRequest};
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 列出成绩，学生只能看到自己的
    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: GradeListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, request, class_id, query).await
    }

    // 录入或覆盖一条成绩
    pub async fn upsert_grade(
        &self,
        request: &HttpRequest,
        class_id: i64,
        req: UpsertGradeRequest,
    ) -> ActixResult<HttpResponse> {
        upsert::upsert_grade(self, request, class_id, req).await
    }

    // CSV 批量导入
    pub async fn import_grades(
        &self,
        request: &HttpRequest,
        class_id: i64,
        payload: Multipart,
    ) -> ActixResult<HttpResponse> {
        import::import_grades(self, request, class_id, payload).await
    }
}
