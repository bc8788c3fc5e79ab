//! 评分周期存储操作

use super::SeaOrmStorage;
use crate::entity::categories::{Column as CategoryColumn, Entity as Categories};
use crate::entity::format_date;
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::periods::{ActiveModel, Column, Entity as Periods};
use crate::entity::tasks::{Column as TaskColumn, Entity as Tasks};
use crate::errors::{GradebookError, Result};
use crate::models::periods::{entities::Period, requests::CreatePeriodRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
    Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 列出班级全部评分周期（按 sort_order、id 排序）
    pub async fn list_periods_impl(&self, class_id: i64) -> Result<Vec<Period>> {
        let periods = Periods::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::SortOrder)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询评分周期失败: {e}")))?;

        Ok(periods.into_iter().map(|m| m.into_period()).collect())
    }

    /// 获取班级内的评分周期
    pub async fn get_period_impl(&self, class_id: i64, period_id: i64) -> Result<Option<Period>> {
        let result = Periods::find()
            .filter(
                Condition::all()
                    .add(Column::Id.eq(period_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询评分周期失败: {e}")))?;

        Ok(result.map(|m| m.into_period()))
    }

    /// 创建评分周期
    pub async fn create_period_impl(
        &self,
        class_id: i64,
        req: CreatePeriodRequest,
    ) -> Result<Period> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            name: Set(req.name),
            weight: Set(req.weight),
            start_date: Set(format_date(req.start_date)),
            end_date: Set(format_date(req.end_date)),
            sort_order: Set(req.sort_order.unwrap_or(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建评分周期失败: {e}")))?;

        Ok(result.into_period())
    }

    /// 删除评分周期，同时删除其类别、任务与这些任务的成绩
    pub async fn delete_period_impl(&self, class_id: i64, period_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        let task_ids: Vec<i64> = Tasks::find()
            .select_only()
            .column(TaskColumn::Id)
            .filter(
                Condition::all()
                    .add(TaskColumn::ClassId.eq(class_id))
                    .add(TaskColumn::PeriodId.eq(period_id)),
            )
            .into_tuple()
            .all(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询周期任务失败: {e}")))?;

        if !task_ids.is_empty() {
            Grades::delete_many()
                .filter(
                    Condition::all()
                        .add(GradeColumn::ClassId.eq(class_id))
                        .add(GradeColumn::TaskId.is_in(task_ids)),
                )
                .exec(&txn)
                .await
                .map_err(|e| GradebookError::database_operation(format!("删除周期成绩失败: {e}")))?;

            Tasks::delete_many()
                .filter(
                    Condition::all()
                        .add(TaskColumn::ClassId.eq(class_id))
                        .add(TaskColumn::PeriodId.eq(period_id)),
                )
                .exec(&txn)
                .await
                .map_err(|e| GradebookError::database_operation(format!("删除周期任务失败: {e}")))?;
        }

        Categories::delete_many()
            .filter(
                Condition::all()
                    .add(CategoryColumn::ClassId.eq(class_id))
                    .add(CategoryColumn::PeriodId.eq(period_id)),
            )
            .exec(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除周期类别失败: {e}")))?;

        let result = Periods::delete_many()
            .filter(
                Condition::all()
                    .add(Column::Id.eq(period_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .exec(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除评分周期失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::SeaOrmStorage;
    use crate::models::categories::requests::CreateCategoryRequest;
    use crate::models::periods::requests::CreatePeriodRequest;
    use crate::models::tasks::requests::CreateTaskRequest;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, ConnectionTrait, Database};

    async fn memory_storage() -> SeaOrmStorage {
        // 内存库每个连接各自独立，只能用单连接
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db.execute_unprepared(
            "INSERT INTO users (id, username, email, role, status, created_at, updated_at) \
             VALUES (1, 'teacher', 'teacher@example.com', 'teacher', 'active', 0, 0)",
        )
        .await
        .unwrap();
        db.execute_unprepared(
            "INSERT INTO classes (id, teacher_id, class_name, created_at, updated_at) \
             VALUES (7, 1, 'Physics', 0, 0)",
        )
        .await
        .unwrap();
        SeaOrmStorage { db }
    }

    #[actix_web::test]
    async fn test_delete_period_removes_categories_and_tasks() {
        let storage = memory_storage().await;
        let period = storage
            .create_period_impl(
                7,
                CreatePeriodRequest {
                    name: "Term 1".to_string(),
                    weight: 50.0,
                    start_date: None,
                    end_date: None,
                    sort_order: None,
                },
            )
            .await
            .unwrap();
        storage
            .create_category_impl(
                7,
                CreateCategoryRequest {
                    period_id: period.id,
                    name: "Labs".to_string(),
                    weight: 30.0,
                },
            )
            .await
            .unwrap();
        storage
            .create_task_impl(
                7,
                period.id,
                CreateTaskRequest {
                    period_id: Some(period.id),
                    category_id: None,
                    title: "Lab 1".to_string(),
                    max_points: 10.0,
                    weight: 1.0,
                    due_date: None,
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_period_impl(7, period.id).await.unwrap());
        assert!(storage.list_categories_impl(7, None).await.unwrap().is_empty());
        assert!(storage.list_tasks_impl(7, None).await.unwrap().is_empty());
        assert!(storage.list_periods_impl(7).await.unwrap().is_empty());
        assert!(!storage.delete_period_impl(7, period.id).await.unwrap());
    }
}
