pub mod create;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::categories::requests::{CategoryListParams, CreateCategoryRequest};
use crate::storage::Storage;

pub struct CategoryService {
    storage: Option<Arc<dyn Storage>>,
}

impl CategoryService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    pub async fn list_categories(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: CategoryListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_categories(self, request, class_id, query).await
    }

    pub async fn create_category(
        &self,
        request: &HttpRequest,
        class_id: i64,
        req: CreateCategoryRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_category(self, request, class_id, req).await
    }
}
