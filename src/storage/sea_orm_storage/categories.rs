//! 评分类别存储操作

use super::SeaOrmStorage;
use crate::entity::categories::{ActiveModel, Column, Entity as Categories};
use crate::errors::{GradebookError, Result};
use crate::models::categories::{entities::Category, requests::CreateCategoryRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 列出类别，可按周期过滤
    pub async fn list_categories_impl(
        &self,
        class_id: i64,
        period_id: Option<i64>,
    ) -> Result<Vec<Category>> {
        let mut select = Categories::find().filter(Column::ClassId.eq(class_id));

        if let Some(period_id) = period_id {
            select = select.filter(Column::PeriodId.eq(period_id));
        }

        let categories = select
            .order_by_asc(Column::PeriodId)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询评分类别失败: {e}")))?;

        Ok(categories.into_iter().map(|m| m.into_category()).collect())
    }

    pub async fn get_category_impl(
        &self,
        class_id: i64,
        category_id: i64,
    ) -> Result<Option<Category>> {
        let result = Categories::find()
            .filter(
                Condition::all()
                    .add(Column::Id.eq(category_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询评分类别失败: {e}")))?;

        Ok(result.map(|m| m.into_category()))
    }

    /// 创建评分类别
    pub async fn create_category_impl(
        &self,
        class_id: i64,
        req: CreateCategoryRequest,
    ) -> Result<Category> {
        let model = ActiveModel {
            class_id: Set(class_id),
            period_id: Set(req.period_id),
            name: Set(req.name),
            weight: Set(req.weight),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("创建评分类别失败: {e}")))?;

        Ok(result.into_category())
    }
}
