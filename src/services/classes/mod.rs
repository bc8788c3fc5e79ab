pub mod get;
pub mod list;
pub mod students;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::class_users::requests::ClassUserListParams;
use crate::models::classes::requests::ClassQueryParams;
use crate::storage::Storage;

pub struct ClassService {
    storage: Option<Arc<dyn Storage>>,
}

impl ClassService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => super::storage_from_request(request),
        }
    }

    // 获取班级列表（管理员全部，教师自己的，学生已加入的）
    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassQueryParams,
    ) -> ActixResult<HttpResponse> {
        list::list_classes(self, request, query).await
    }

    // 获取班级详情
    pub async fn get_class(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_class(self, request).await
    }

    // 班级学生名单
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        class_id: i64,
        query: ClassUserListParams,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, request, class_id, query).await
    }
}
