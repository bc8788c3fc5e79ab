//! 成绩存储操作

use super::SeaOrmStorage;
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::errors::{GradebookError, Result};
use crate::models::{
    PaginationInfo,
    grades::{
        entities::Grade,
        requests::{GradeListQuery, UpsertGradeRequest},
        responses::GradeListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    /// 班级全部成绩
    pub async fn list_grades_impl(&self, class_id: i64) -> Result<Vec<Grade>> {
        let grades = Grades::find()
            .filter(Column::ClassId.eq(class_id))
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(grades.into_iter().map(|m| m.into_grade()).collect())
    }

    /// 列出成绩（分页）
    pub async fn list_grades_with_pagination_impl(
        &self,
        class_id: i64,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = Grades::find().filter(Column::ClassId.eq(class_id));

        // 学生筛选
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        // 任务筛选
        if let Some(task_id) = query.task_id {
            select = select.filter(Column::TaskId.eq(task_id));
        }

        let paginator = select
            .order_by_desc(Column::UpdatedAt)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩页数失败: {e}")))?;

        let grades = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩列表失败: {e}")))?;

        Ok(GradeListResponse {
            items: grades.into_iter().map(|m| m.into_grade()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 录入或覆盖成绩，以 (student_id, task_id) 为键
    pub async fn upsert_grade_impl(
        &self,
        class_id: i64,
        grader_id: i64,
        req: UpsertGradeRequest,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let existing = Grades::find()
            .filter(
                Condition::all()
                    .add(Column::StudentId.eq(req.student_id))
                    .add(Column::TaskId.eq(req.task_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询成绩失败: {e}")))?;

        let result = match existing {
            Some(existing) => {
                let model = ActiveModel {
                    id: Set(existing.id),
                    class_id: Set(class_id),
                    score: Set(req.score),
                    grader_id: Set(Some(grader_id)),
                    comment: Set(req.comment),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| GradebookError::database_operation(format!("更新成绩失败: {e}")))?
            }
            None => {
                let model = ActiveModel {
                    class_id: Set(class_id),
                    student_id: Set(req.student_id),
                    task_id: Set(req.task_id),
                    score: Set(req.score),
                    grader_id: Set(Some(grader_id)),
                    comment: Set(req.comment),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .insert(&self.db)
                    .await
                    .map_err(|e| GradebookError::database_operation(format!("录入成绩失败: {e}")))?
            }
        };

        Ok(result.into_grade())
    }
}
