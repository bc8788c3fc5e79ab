//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod categories;
mod class_users;
mod classes;
mod grades;
mod periods;
mod tasks;
mod users;

use crate::config::AppConfig;
use crate::errors::{GradebookError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 创建新的 SeaORM 存储实例
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(&config.database.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| GradebookError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| GradebookError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory")
            .pragma("mmap_size", "536870912")
            .pragma("wal_autocheckpoint", "1000");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(5)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| GradebookError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite://") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") || url == ":memory:" {
            Ok(format!("sqlite://{}?mode=rwc", url))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(GradebookError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SeaOrmStorage;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("gradebook.db").unwrap(),
            "sqlite://gradebook.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@localhost/gb").unwrap(),
            "postgres://u:p@localhost/gb"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("redis://localhost")
                .unwrap_err()
                .code(),
            "E003"
        );
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    // 班级模块
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    // 班级成员模块
    async fn get_class_user_by_user_id_and_class_id(
        &self,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<ClassUser>> {
        self.get_class_user_by_user_id_and_class_id_impl(user_id, class_id)
            .await
    }

    async fn list_class_users_with_pagination(
        &self,
        class_id: i64,
        query: ClassUserQuery,
    ) -> Result<ClassUserListResponse> {
        self.list_class_users_with_pagination_impl(class_id, query)
            .await
    }

    async fn list_class_students(&self, class_id: i64) -> Result<Vec<Student>> {
        self.list_class_students_impl(class_id).await
    }

    // 周期模块
    async fn list_periods(&self, class_id: i64) -> Result<Vec<Period>> {
        self.list_periods_impl(class_id).await
    }

    async fn get_period(&self, class_id: i64, period_id: i64) -> Result<Option<Period>> {
        self.get_period_impl(class_id, period_id).await
    }

    async fn create_period(&self, class_id: i64, req: CreatePeriodRequest) -> Result<Period> {
        self.create_period_impl(class_id, req).await
    }

    async fn delete_period(&self, class_id: i64, period_id: i64) -> Result<bool> {
        self.delete_period_impl(class_id, period_id).await
    }

    // 类别模块
    async fn list_categories(
        &self,
        class_id: i64,
        period_id: Option<i64>,
    ) -> Result<Vec<Category>> {
        self.list_categories_impl(class_id, period_id).await
    }

    async fn get_category(&self, class_id: i64, category_id: i64) -> Result<Option<Category>> {
        self.get_category_impl(class_id, category_id).await
    }

    async fn create_category(
        &self,
        class_id: i64,
        req: CreateCategoryRequest,
    ) -> Result<Category> {
        self.create_category_impl(class_id, req).await
    }

    // 任务模块
    async fn list_tasks(&self, class_id: i64, period_id: Option<i64>) -> Result<Vec<Task>> {
        self.list_tasks_impl(class_id, period_id).await
    }

    async fn get_task(&self, class_id: i64, task_id: i64) -> Result<Option<Task>> {
        self.get_task_impl(class_id, task_id).await
    }

    async fn create_task(
        &self,
        class_id: i64,
        period_id: i64,
        req: CreateTaskRequest,
    ) -> Result<Task> {
        self.create_task_impl(class_id, period_id, req).await
    }

    async fn update_task(
        &self,
        class_id: i64,
        task_id: i64,
        update: UpdateTaskRequest,
    ) -> Result<Option<Task>> {
        self.update_task_impl(class_id, task_id, update).await
    }

    async fn delete_task(&self, class_id: i64, task_id: i64) -> Result<bool> {
        self.delete_task_impl(class_id, task_id).await
    }

    // 成绩模块
    async fn list_grades(&self, class_id: i64) -> Result<Vec<Grade>> {
        self.list_grades_impl(class_id).await
    }

    async fn list_grades_with_pagination(
        &self,
        class_id: i64,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        self.list_grades_with_pagination_impl(class_id, query).await
    }

    async fn upsert_grade(
        &self,
        class_id: i64,
        grader_id: i64,
        req: UpsertGradeRequest,
    ) -> Result<Grade> {
        self.upsert_grade_impl(class_id, grader_id, req).await
    }
}
