use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, can_manage, enrollment_not_found};
use crate::errors::AcademiaError;
use crate::models::ApiResponse;
use crate::services::{current_scope, current_user};

/// 学生可以退选自己的课程，院系范围的管理员可以删除范围内的选课
pub async fn delete_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;

    let Some(detail) = storage.get_enrollment_by_id(enrollment_id).await? else {
        return Ok(enrollment_not_found());
    };

    if !can_manage(&storage, scope, &detail.enrollment).await? {
        return Err(AcademiaError::authorization("无权删除该选课记录").into());
    }

    if storage.delete_enrollment(enrollment_id).await? {
        tracing::info!(
            "Enrollment {} ({} / {}) deleted by {}",
            enrollment_id,
            detail.student_username,
            detail.subject_code,
            user.username
        );
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("选课已删除")))
    } else {
        Ok(enrollment_not_found())
    }
}
