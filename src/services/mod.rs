pub mod assignments;
pub mod auth;
pub mod careers;
pub mod enrollments;
pub mod faculties;
pub mod grades;
pub mod periods;
pub mod reports;
pub mod roles;
pub mod subjects;
pub mod submissions;
pub mod system;
pub mod users;

pub use assignments::AssignmentService;
pub use auth::AuthService;
pub use careers::CareerService;
pub use enrollments::EnrollmentService;
pub use faculties::FacultyService;
pub use grades::GradeService;
pub use periods::PeriodService;
pub use reports::ReportService;
pub use roles::RoleService;
pub use subjects::SubjectService;
pub use submissions::SubmissionService;
pub use system::SystemService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse, web};
use std::sync::Arc;
use tracing::warn;

use crate::cache::{ObjectCache, user_cache_key};
use crate::errors::{AcademiaError, Result};
use crate::middlewares::RequireJWT;
use crate::models::access::AccessScope;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::storage::Storage;
use crate::tasks::{Job, TaskQueue};

/// 取存储实例：优先使用服务自带的，否则从 app_data 读取
pub(crate) fn resolve_storage(
    own: &Option<Arc<dyn Storage>>,
    request: &HttpRequest,
) -> Result<Arc<dyn Storage>> {
    if let Some(storage) = own {
        return Ok(storage.clone());
    }
    request
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| AcademiaError::database_config("Storage not found in app data"))
}

pub(crate) fn object_cache(request: &HttpRequest) -> Option<Arc<dyn ObjectCache>> {
    request
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
}

/// 用户资料或角色变化后清除认证缓存
pub(crate) async fn invalidate_user(request: &HttpRequest, user_id: i64) {
    if let Some(cache) = object_cache(request) {
        cache.remove(&user_cache_key(user_id)).await;
    }
}

/// 提交后台任务，队列不可用时只记录日志
pub(crate) fn dispatch_job(request: &HttpRequest, job: Job) {
    match request.app_data::<web::Data<TaskQueue>>() {
        Some(queue) => queue.dispatch(job),
        None => warn!("Task queue not configured, job {} dropped", job.name()),
    }
}

pub(crate) fn current_user(request: &HttpRequest) -> Result<User> {
    RequireJWT::extract_user(request)
        .ok_or_else(|| AcademiaError::authentication("无法获取用户信息"))
}

pub(crate) fn current_scope(request: &HttpRequest) -> Result<AccessScope> {
    RequireJWT::extract_scope(request)
        .ok_or_else(|| AcademiaError::authentication("无法获取用户信息"))
}

pub(crate) fn require_permission(user: &User, permission: &str) -> Result<()> {
    if user.has_permission(permission) {
        Ok(())
    } else {
        Err(AcademiaError::authorization(format!(
            "缺少权限: {permission}"
        )))
    }
}

pub(crate) fn validation_response(errors: FieldErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::validation_failed(errors))
}

pub(crate) fn field_error(field: &str, message: impl Into<String>) -> HttpResponse {
    let mut errors = FieldErrors::new();
    errors.insert(field.to_string(), message.into());
    validation_response(errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::entities::RoleCode;
    use crate::models::users::entities::fixtures::user;
    use actix_web::body::to_bytes;
    use actix_web::http::StatusCode;

    #[test]
    fn test_require_permission() {
        let mut u = user(1, &[RoleCode::Teacher]);
        u.permissions = vec!["grade_assignment".to_string()];
        assert!(require_permission(&u, "grade_assignment").is_ok());
        let err = require_permission(&u, "assign_roles").unwrap_err();
        assert_eq!(err.code(), "E013");
    }

    #[actix_web::test]
    async fn test_field_error_body() {
        let resp = field_error("title", "too short");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], ErrorCode::ValidationFailed as i32);
        assert_eq!(json["data"]["title"], "too short");
    }

    #[actix_web::test]
    async fn test_missing_storage_is_error() {
        let req = actix_web::test::TestRequest::default().to_http_request();
        assert!(resolve_storage(&None, &req).is_err());
        assert!(current_user(&req).is_err());
    }
}
