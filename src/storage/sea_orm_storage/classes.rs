//! 班级存储操作

use super::SeaOrmStorage;
use crate::entity::class_users::{Column as ClassUserColumn, Entity as ClassUsers};
use crate::entity::classes::{Column, Entity as Classes};
use crate::errors::{GradebookError, Result};
use crate::models::{
    PaginationInfo,
    classes::{entities::Class, requests::ClassListQuery, responses::ClassListResponse},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

impl SeaOrmStorage {
    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 分页列出班级
    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = Classes::find();

        // 教师筛选
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }

        // 成员筛选：只返回用户加入的班级
        if let Some(member_id) = query.member_id {
            let class_ids: Vec<i64> = ClassUsers::find()
                .select_only()
                .column(ClassUserColumn::ClassId)
                .filter(ClassUserColumn::UserId.eq(member_id))
                .into_tuple()
                .all(&self.db)
                .await
                .map_err(|e| {
                    GradebookError::database_operation(format!("查询用户班级关联失败: {e}"))
                })?;
            select = select.filter(Column::Id.is_in(class_ids));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::ClassName.contains(&escaped));
        }

        // 排序
        select = select.order_by_desc(Column::CreatedAt);

        // 分页查询
        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级页数失败: {e}")))?;

        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级列表失败: {e}")))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }
}
