pub mod available;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod withdraw;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AcademiaError, Result};
use crate::models::access::AccessScope;
use crate::models::enrollments::entities::Enrollment;
use crate::models::enrollments::requests::{
    AvailableSubjectsParams, CreateEnrollmentRequest, EnrollmentListParams,
};
use crate::models::roles::entities::RoleCode;
use crate::models::users::entities::{User, UserStatus};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_enrollments(
        &self,
        query: EnrollmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, query, request).await
    }

    pub async fn create_enrollment(
        &self,
        enrollment_data: CreateEnrollmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, enrollment_data, request).await
    }

    pub async fn list_available(
        &self,
        query: AvailableSubjectsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        available::list_available(self, query, request).await
    }

    pub async fn get_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_enrollment(self, enrollment_id, request).await
    }

    pub async fn withdraw_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        withdraw::withdraw_enrollment(self, enrollment_id, request).await
    }

    pub async fn delete_enrollment(
        &self,
        enrollment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_enrollment(self, enrollment_id, request).await
    }
}

pub(crate) fn enrollment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::EnrollmentNotFound,
        "选课记录不存在",
    ))
}

pub(crate) fn enrollment_not_allowed(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::EnrollmentNotAllowed,
        message,
    ))
}

/// 学生可以处理自己的选课，院系范围的管理员处理范围内课程的选课，教师不可以
pub(crate) async fn can_manage(
    storage: &Arc<dyn Storage>,
    scope: AccessScope,
    enrollment: &Enrollment,
) -> Result<bool> {
    Ok(match scope {
        AccessScope::Enrolled(student_id) => enrollment.student_id == student_id,
        AccessScope::Everything | AccessScope::Faculty(_) => {
            storage
                .subject_in_scope(scope, enrollment.subject_id)
                .await?
        }
        AccessScope::Teaching(_) => false,
    })
}

/// 确定选课的学生：默认为本人，教职工可以指定学生
pub(crate) async fn resolve_student(
    storage: &Arc<dyn Storage>,
    caller: &User,
    scope: &AccessScope,
    student_id: Option<i64>,
) -> Result<Option<User>> {
    let target = student_id.unwrap_or(caller.id);
    if target == caller.id {
        return Ok(Some(caller.clone()));
    }
    if !scope.is_staff() {
        return Err(AcademiaError::authorization("只能为自己选课"));
    }
    Ok(storage
        .get_user_by_id(target)
        .await?
        .filter(|u| u.has_role(RoleCode::Student) && u.status == UserStatus::Active))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        assert_eq!(enrollment_not_found().status(), 404);
        assert_eq!(enrollment_not_allowed("x").status(), 400);
    }
}
