//! 班级成员存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::class_users::{Column, Entity as ClassUsers};
use crate::entity::users::{Column as UserColumn, Entity as Users};
use crate::errors::{GradebookError, Result};
use crate::models::{
    PaginationInfo,
    class_users::{
        entities::{ClassUser, ClassUserRole},
        requests::ClassUserQuery,
        responses::ClassUserListResponse,
    },
    gradebook::entities::Student,
};
use crate::utils::escape_like_pattern;
use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 分页列出班级成员
    pub async fn list_class_users_with_pagination_impl(
        &self,
        class_id: i64,
        query: ClassUserQuery,
    ) -> Result<ClassUserListResponse> {
        let page = query.page.unwrap_or(1).max(1) as u64;
        let size = query.size.unwrap_or(20).clamp(1, 100) as u64;

        let mut select = ClassUsers::find().filter(Column::ClassId.eq(class_id));

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(Column::ProfileName.contains(&escaped));
        }

        let paginator = select
            .order_by_asc(Column::JoinedAt)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级成员总数失败: {e}")))?;

        let pages = paginator
            .num_pages()
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级成员页数失败: {e}")))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级成员列表失败: {e}")))?;

        Ok(ClassUserListResponse {
            items: users.into_iter().map(|m| m.into_class_user()).collect(),
            pagination: PaginationInfo {
                page: page as i64,
                page_size: size as i64,
                total: total as i64,
                total_pages: pages as i64,
            },
        })
    }

    /// 班级学生名单
    ///
    /// 名称优先使用班级内昵称，其次是用户昵称和用户名。
    pub async fn list_class_students_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let members = ClassUsers::find()
            .filter(
                Condition::all()
                    .add(Column::ClassId.eq(class_id))
                    .add(Column::Role.eq(ClassUserRole::STUDENT)),
            )
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级学生失败: {e}")))?;

        if members.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i64> = members.iter().map(|m| m.user_id).collect();
        let users: HashMap<i64, _> = Users::find()
            .filter(UserColumn::Id.is_in(user_ids))
            .all(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询学生信息失败: {e}")))?
            .into_iter()
            .map(|u| (u.id, u.into_user()))
            .collect();

        let mut students: Vec<Student> = members
            .into_iter()
            .filter_map(|m| {
                let user = users.get(&m.user_id)?;
                let name = m
                    .profile_name
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| user.name().to_string());
                Some(Student {
                    id: m.user_id,
                    name,
                })
            })
            .collect();
        students.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(students)
    }

    /// 获取用户在班级中的信息
    pub async fn get_class_user_by_user_id_and_class_id_impl(
        &self,
        user_id: i64,
        class_id: i64,
    ) -> Result<Option<ClassUser>> {
        let result = ClassUsers::find()
            .filter(
                Condition::all()
                    .add(Column::UserId.eq(user_id))
                    .add(Column::ClassId.eq(class_id)),
            )
            .one(&self.db)
            .await
            .map_err(|e| GradebookError::database_operation(format!("查询班级成员失败: {e}")))?;

        Ok(result.map(|m| m.into_class_user()))
    }
}
