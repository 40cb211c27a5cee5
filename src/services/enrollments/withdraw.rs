use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, can_manage, enrollment_not_allowed, enrollment_not_found};
use crate::errors::AcademiaError;
use crate::models::ApiResponse;
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::services::{current_scope, current_user};

/// 退选：记录保留为 withdrawn，之后可以重新选课
pub async fn withdraw_enrollment(
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
        return Err(AcademiaError::authorization("无权退选该课程").into());
    }
    if detail.enrollment.status == EnrollmentStatus::Withdrawn {
        return Ok(enrollment_not_allowed("该课程已退选"));
    }

    let Some(enrollment) = storage.withdraw_enrollment(enrollment_id).await? else {
        return Ok(enrollment_not_found());
    };
    tracing::info!(
        "Student {} withdrew from {} by {}",
        detail.student_username,
        detail.subject_code,
        user.username
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "退选成功")))
}
