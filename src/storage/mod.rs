use std::sync::Arc;

use crate::models::{
    categories::{entities::Category, requests::CreateCategoryRequest},
    class_users::{
        entities::ClassUser, requests::ClassUserQuery, responses::ClassUserListResponse,
    },
    classes::{entities::Class, requests::ClassListQuery, responses::ClassListResponse},
    gradebook::entities::Student,
    grades::{
        entities::Grade,
        requests::{GradeListQuery, UpsertGradeRequest},
        responses::GradeListResponse,
    },
    periods::{entities::Period, requests::CreatePeriodRequest},
    tasks::{
        entities::Task,
        requests::{CreateTaskRequest, UpdateTaskRequest},
    },
    users::entities::User,
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;

    /// 班级管理方法
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出班级（按教师或成员过滤）
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;

    /// 班级成员管理方法
    // 获取用户在班级中的信息
    async fn get_class_user_by_user_id_and_class_id(
        &self,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<ClassUser>>;
    // 列出班级成员
    async fn list_class_users_with_pagination(
        &self,
        class_id: i64,
        query: ClassUserQuery,
    ) -> Result<ClassUserListResponse>;
    // 班级学生名单（成绩汇总使用）
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<Student>>;

    /// 评分周期
    async fn list_periods(&self, class_id: i64) -> Result<Vec<Period>>;
    async fn get_period(&self, class_id: i64, period_id: i64) -> Result<Option<Period>>;
    async fn create_period(&self, class_id: i64, req: CreatePeriodRequest) -> Result<Period>;
    // 删除周期及其任务、成绩
    async fn delete_period(&self, class_id: i64, period_id: i64) -> Result<bool>;

    /// 评分类别
    async fn list_categories(&self, class_id: i64, period_id: Option<i64>)
    -> Result<Vec<Category>>;
    async fn get_category(&self, class_id: i64, category_id: i64) -> Result<Option<Category>>;
    async fn create_category(&self, class_id: i64, req: CreateCategoryRequest)
    -> Result<Category>;

    /// 任务
    async fn list_tasks(&self, class_id: i64, period_id: Option<i64>) -> Result<Vec<Task>>;
    async fn get_task(&self, class_id: i64, task_id: i64) -> Result<Option<Task>>;
    // period_id 由服务层确定（显式指定或按截止日期归档）
    async fn create_task(
        &self,
        class_id: i64,
        period_id: i64,
        req: CreateTaskRequest,
    ) -> Result<Task>;
    async fn update_task(
        &self,
        class_id: i64,
        task_id: i64,
        update: UpdateTaskRequest,
    ) -> Result<Option<Task>>;
    // 删除任务及其成绩
    async fn delete_task(&self, class_id: i64, task_id: i64) -> Result<bool>;

    /// 成绩
    // 班级全部成绩（汇总计算使用）
    async fn list_grades(&self, class_id: i64) -> Result<Vec<Grade>>;
    async fn list_grades_with_pagination(
        &self,
        class_id: i64,
        query: GradeListQuery,
    ) -> Result<GradeListResponse>;
    // 按 (student_id, task_id) 新增或覆盖成绩
    async fn upsert_grade(
        &self,
        class_id: i64,
        grader_id: i64,
        req: UpsertGradeRequest,
    ) -> Result<Grade>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
