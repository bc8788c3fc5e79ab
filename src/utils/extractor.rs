//! 路径参数提取器
//!
//! 路由中的 ID 必须是正整数，解析失败时直接返回统一格式的 400 响应，
//! 不进入业务逻辑。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError, http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::{ApiResponse, ErrorCode};

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            let message = format!("Invalid path parameter `{name}`: {raw}");
            let response = HttpResponse::build(StatusCode::BAD_REQUEST)
                .json(ApiResponse::<()>::error_empty(ErrorCode::BadRequest, &message));
            Err(InternalError::from_response(message, response).into())
        }
    }
}

/// 生成按路径参数名解析 i64 的提取器
macro_rules! define_safe_id_extractors {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $name(pub i64);

            impl FromRequest for $name {
                type Error = actix_web::Error;
                type Future = Ready<Result<Self, Self::Error>>;

                fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
                    ready(parse_positive_id(req, $param).map($name))
                }
            }
        )*
    };
}

define_safe_id_extractors! {
    SafeClassIdI64 => "class_id",
    SafePeriodIdI64 => "period_id",
    SafeTaskIdI64 => "task_id",
    SafeStudentIdI64 => "student_id",
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_valid_class_id() {
        let req = TestRequest::default()
            .param("class_id", "42")
            .to_http_request();
        let id = SafeClassIdI64::extract(&req).await.expect("valid id");
        assert_eq!(id.0, 42);
    }

    #[actix_web::test]
    async fn test_rejects_non_numeric_and_non_positive() {
        let req = TestRequest::default()
            .param("task_id", "abc")
            .to_http_request();
        assert!(SafeTaskIdI64::extract(&req).await.is_err());

        let req = TestRequest::default()
            .param("task_id", "0")
            .to_http_request();
        assert!(SafeTaskIdI64::extract(&req).await.is_err());
    }
}
