//! 任务存储操作

use super::SeaOrmStorage;
use crate::entity::format_date;
use crate::entity::grades::{Column as GradeColumn, Entity as Grades};
use crate::entity::tasks::{ActiveModel, Column, Entity as Tasks};
use crate::errors::{GradebookError, Result};
use crate::models::tasks::{
    entities::Task,
    requests::{CreateTaskRequest, UpdateTaskRequest},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 列出任务，可按周期过滤
    pub async fn list_tasks_impl(&self, class_id: i64, period_id: Option<i64>) -> Result<Vec<Task>> {
        let mut select = Tasks::find().filter(Column::ClassId.eq(class_id));

        if let Some(period_id) = period_id {
            select = select.filter(Column::PeriodId.eq(period_id));
        }

        let tasks = select
            .order_by_asc(Column::PeriodId)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询任务列表失败: {e}")))?;

        Ok(tasks.into_iter().map(|m| m.into_task()).collect())
    }

    pub async fn get_task_impl(&self, class_id: i64, task_id: i64) -> Result<Option<Task>> {
        let result = self.find_task_model(class_id, task_id).await?;
        Ok(result.map(|m| m.into_task()))
    }

    async fn find_task_model(
        &self,
        class_id: i64,
        task_id: i64,
    ) -> Result<Option<crate::entity::tasks::Model>> {
        Tasks::find()
            .filter(
                Condition::all()
                    .add(Column::Id.eq(task_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询任务失败: {e}")))
    }

    /// 创建任务
    pub async fn create_task_impl(
        &self,
        class_id: i64,
        period_id: i64,
        req: CreateTaskRequest,
    ) -> Result<Task> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            class_id: Set(class_id),
            period_id: Set(period_id),
            category_id: Set(req.category_id),
            title: Set(req.title),
            max_points: Set(req.max_points),
            weight: Set(req.weight),
            due_date: Set(format_date(req.due_date)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建任务失败: {e}")))?;

        Ok(result.into_task())
    }

    /// 更新任务
    pub async fn update_task_impl(
        &self,
        class_id: i64,
        task_id: i64,
        update: UpdateTaskRequest,
    ) -> Result<Option<Task>> {
        // 先检查任务是否存在
        if self.find_task_model(class_id, task_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(task_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(category_id) = update.category_id {
            model.category_id = Set(Some(category_id));
        }

        if let Some(title) = update.title {
            model.title = Set(title);
        }

        if let Some(max_points) = update.max_points {
            model.max_points = Set(max_points);
        }

        if let Some(weight) = update.weight {
            model.weight = Set(weight);
        }

        if let Some(due_date) = update.due_date {
            model.due_date = Set(format_date(Some(due_date)));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("更新任务失败: {e}")))?;

        Ok(Some(result.into_task()))
    }

    /// 删除任务及其成绩
    pub async fn delete_task_impl(&self, class_id: i64, task_id: i64) -> Result<bool> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| GradebookError::database_operation(format!("开启事务失败: {e}")))?;

        Grades::delete_many()
            .filter(
                Condition::all()
                    .add(GradeColumn::ClassId.eq(class_id))
                    .add(GradeColumn::TaskId.eq(task_id)),
            )
            .exec(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除任务成绩失败: {e}")))?;

        let result = Tasks::delete_many()
            .filter(
                Condition::all()
                    .add(Column::Id.eq(task_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .exec(&txn)
            .await
            .map_err(|e| GradebookError::database_operation(format!("删除任务失败: {e}")))?;

        txn.commit()
            .await
            .map_err(|e| GradebookError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(result.rows_affected > 0)
    }
}
