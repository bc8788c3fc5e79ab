/*!
 * 基于班级角色的访问控制中间件
 *
 * 此中间件必须在 RequireJWT 中间件之后使用。它从路径读取 `{class_id}`，
 * 确认班级存在并解析当前用户在班级中的身份：
 *
 * - 管理员直接放行
 * - 班级的 `teacher_id` 视为班级教师，即使没有成员记录
 * - 其他用户按 `class_users` 中的角色判断
 *
 * 通过后在请求扩展中写入 [`ClassAccess`]，供服务层判断可见范围。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * web::scope("/api/v1/classes/{class_id}")
 *     .wrap(RequireClassRole::new_any(ClassUserRole::all_roles()))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error};

use crate::{
    models::{
        ErrorCode,
        class_users::entities::ClassUserRole,
        classes::entities::Class,
        users::entities::{User, UserRole},
    },
    storage::Storage,
};

use super::create_error_response;

/// 当前用户在班级中的访问身份
#[derive(Debug, Clone)]
pub struct ClassAccess {
    pub class: Class,
    pub user_id: i64,
    pub is_admin: bool,
    /// 管理员没有班级角色
    pub role: Option<ClassUserRole>,
}

impl ClassAccess {
    /// 班级教师或管理员
    pub fn can_manage(&self) -> bool {
        self.is_admin || self.role == Some(ClassUserRole::Teacher)
    }

    pub fn is_student(&self) -> bool {
        !self.is_admin && self.role == Some(ClassUserRole::Student)
    }

    /// 能否查看指定学生的成绩
    pub fn can_view_student(&self, student_id: i64) -> bool {
        self.can_manage() || self.user_id == student_id
    }
}

#[derive(Clone)]
pub struct RequireClassRole {
    required_roles: Vec<ClassUserRole>,
}

impl RequireClassRole {
    /// 创建需要任一班级角色的中间件
    pub fn new_any(roles: &[&ClassUserRole]) -> Self {
        Self {
            required_roles: roles.iter().map(|r| (*r).clone()).collect(),
        }
    }

    /// 从请求扩展中提取班级访问身份
    /// 此函数应该在应用了RequireClassRole中间件的路由处理程序中使用
    pub fn extract_class_access(req: &actix_web::HttpRequest) -> Option<ClassAccess> {
        req.extensions().get::<ClassAccess>().cloned()
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireClassRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireClassRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireClassRoleMiddleware {
            service: Rc::new(service),
            required_roles: self.required_roles.clone(),
        }))
    }
}

pub struct RequireClassRoleMiddleware<S> {
    service: Rc<S>,
    required_roles: Vec<ClassUserRole>,
}

/// 解析失败时的响应
struct Rejection {
    status: StatusCode,
    code: ErrorCode,
    message: &'static str,
}

impl Rejection {
    fn new(status: StatusCode, code: ErrorCode, message: &'static str) -> Self {
        Self {
            status,
            code,
            message,
        }
    }
}

async fn resolve_class_access(
    req: &ServiceRequest,
    required_roles: &[ClassUserRole],
) -> Result<ClassAccess, Rejection> {
    // 1. 校验用户信息
    let user = req.extensions().get::<User>().cloned().ok_or_else(|| {
        Rejection::new(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "Unauthorized: missing user claims",
        )
    })?;

    // 2. 校验 class_id
    let class_id = req
        .match_info()
        .get("class_id")
        .and_then(|s| s.parse::<i64>().ok())
        .filter(|id| *id > 0)
        .ok_or_else(|| {
            Rejection::new(
                StatusCode::BAD_REQUEST,
                ErrorCode::BadRequest,
                "Missing or invalid class_id",
            )
        })?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| {
            error!("Storage not found in app data");
            Rejection::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorCode::InternalServerError,
                "Storage unavailable",
            )
        })?;

    let storage_error = |e: crate::errors::GradebookError| {
        error!("Class access lookup failed: {}", e);
        Rejection::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ErrorCode::InternalServerError,
            "Failed to resolve class membership",
        )
    };

    // 3. 班级必须存在
    let class = storage
        .get_class_by_id(class_id)
        .await
        .map_err(storage_error)?
        .ok_or_else(|| {
            Rejection::new(
                StatusCode::NOT_FOUND,
                ErrorCode::ClassNotFound,
                "Class not found",
            )
        })?;

    // 4. 管理员直接放行
    if user.role == UserRole::Admin {
        return Ok(ClassAccess {
            class,
            user_id: user.id,
            is_admin: true,
            role: None,
        });
    }

    // 5. 解析班级角色
    let role = if class.teacher_id == user.id {
        Some(ClassUserRole::Teacher)
    } else {
        storage
            .get_class_user_by_user_id_and_class_id(user.id, class_id)
            .await
            .map_err(storage_error)?
            .map(|cu| cu.role)
    };

    let role = role.ok_or_else(|| {
        Rejection::new(
            StatusCode::FORBIDDEN,
            ErrorCode::ClassPermissionDenied,
            "No permission for this class",
        )
    })?;

    if !required_roles.contains(&role) {
        return Err(Rejection::new(
            StatusCode::FORBIDDEN,
            ErrorCode::ClassPermissionDenied,
            "Access denied for this class role",
        ));
    }

    Ok(ClassAccess {
        class,
        user_id: user.id,
        is_admin: false,
        role: Some(role),
    })
}

impl<S, B> Service<ServiceRequest> for RequireClassRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let required_roles = self.required_roles.clone();

        Box::pin(async move {
            match resolve_class_access(&req, &required_roles).await {
                Ok(access) => {
                    debug!(
                        "User {} granted access to class {} as {:?}",
                        access.user_id, access.class.id, access.role
                    );
                    req.extensions_mut().insert(access);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(rejection) => Ok(req.into_response(
                    create_error_response(rejection.status, rejection.code, rejection.message)
                        .map_into_right_body(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn access(is_admin: bool, role: Option<ClassUserRole>) -> ClassAccess {
        ClassAccess {
            class: Class {
                id: 1,
                class_name: "Algebra".to_string(),
                description: None,
                teacher_id: 10,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            },
            user_id: 20,
            is_admin,
            role,
        }
    }

    #[test]
    fn test_admin_and_teacher_can_manage() {
        assert!(access(true, None).can_manage());
        assert!(access(false, Some(ClassUserRole::Teacher)).can_manage());
        assert!(!access(false, Some(ClassUserRole::Student)).can_manage());
    }

    #[test]
    fn test_student_sees_only_self() {
        let student = access(false, Some(ClassUserRole::Student));
        assert!(student.is_student());
        assert!(student.can_view_student(20));
        assert!(!student.can_view_student(21));
    }
}
