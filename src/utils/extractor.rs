//! 路径参数提取器
//!
//! 解析失败时直接返回 400 的 ApiResponse，而不是 actix 默认的纯文本错误。

use actix_web::{
    FromRequest, HttpRequest, HttpResponse, dev::Payload, error::InternalError,
    http::StatusCode,
};
use futures_util::future::{Ready, ready};

use crate::models::roles::entities::RoleCode;
use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> actix_web::Error {
    let response = HttpResponse::build(StatusCode::BAD_REQUEST)
        .json(ApiResponse::error_empty(ErrorCode::BadRequest, message.clone()));
    InternalError::from_response(message, response).into()
}

fn parse_positive_id(req: &HttpRequest, name: &str) -> Result<i64, actix_web::Error> {
    let raw = req.match_info().get(name).unwrap_or_default();
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(bad_request(format!("无效的路径参数 {name}: '{raw}'"))),
    }
}

macro_rules! define_id_extractors {
    ($($name:ident => $param:literal),* $(,)?) => {
        $(
            #[derive(Debug, Clone, Copy)]
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

define_id_extractors! {
    SafeIDI64 => "id",
    SafeSubjectIdI64 => "subject_id",
    SafeTeacherIdI64 => "teacher_id",
}

/// `/roles/{code}/...`
#[derive(Debug, Clone, Copy)]
pub struct SafeRoleCode(pub RoleCode);

impl FromRequest for SafeRoleCode {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let raw = req.match_info().get("code").unwrap_or_default();
        ready(
            raw.parse::<RoleCode>()
                .map(SafeRoleCode)
                .map_err(|_| bad_request(format!("无效的角色: '{raw}'"))),
        )
    }
}

/// `/reports/monthly/{year}/{month}`
#[derive(Debug, Clone, Copy)]
pub struct SafeYearMonth {
    pub year: i32,
    pub month: u32,
}

impl FromRequest for SafeYearMonth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let year = req
            .match_info()
            .get("year")
            .and_then(|y| y.parse::<i32>().ok())
            .filter(|y| (2000..=9999).contains(y));
        let month = req
            .match_info()
            .get("month")
            .and_then(|m| m.parse::<u32>().ok())
            .filter(|m| (1..=12).contains(m));

        ready(match (year, month) {
            (Some(year), Some(month)) => Ok(SafeYearMonth { year, month }),
            _ => Err(bad_request("无效的年份或月份".to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn test_id_extractor() {
        let req = TestRequest::default().param("id", "42").to_http_request();
        let SafeIDI64(id) = SafeIDI64::extract(&req).await.unwrap();
        assert_eq!(id, 42);

        let req = TestRequest::default().param("id", "-1").to_http_request();
        assert!(SafeIDI64::extract(&req).await.is_err());

        let req = TestRequest::default().param("teacher_id", "abc").to_http_request();
        assert!(SafeTeacherIdI64::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_year_month_extractor() {
        let req = TestRequest::default()
            .param("year", "2025")
            .param("month", "3")
            .to_http_request();
        let ym = SafeYearMonth::extract(&req).await.unwrap();
        assert_eq!((ym.year, ym.month), (2025, 3));

        let req = TestRequest::default()
            .param("year", "2025")
            .param("month", "13")
            .to_http_request();
        assert!(SafeYearMonth::extract(&req).await.is_err());
    }

    #[actix_web::test]
    async fn test_role_code_extractor() {
        let req = TestRequest::default().param("code", "teacher").to_http_request();
        let SafeRoleCode(role) = SafeRoleCode::extract(&req).await.unwrap();
        assert_eq!(role, RoleCode::Teacher);
    }
}
