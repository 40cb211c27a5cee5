use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, enrollment_not_allowed, resolve_student};
use crate::models::enrollments::entities::EnrollmentStatus;
use crate::models::enrollments::requests::CreateEnrollmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::subjects::{subject_not_found, target_period};
use crate::services::{current_scope, current_user, field_error};

/// 选课
///
/// 课程必须处于启用状态、属于目标学期，并且在学生所在专业的培养方案中。
/// 已退选的课程可以重新选。
pub async fn create_enrollment(
    service: &EnrollmentService,
    enrollment_data: CreateEnrollmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;

    let Some(student) =
        resolve_student(&storage, &user, &scope, enrollment_data.student_id).await?
    else {
        return Ok(field_error("student_id", "学生不存在或未激活"));
    };
    let Some(career_id) = student.career_id else {
        return Ok(enrollment_not_allowed("学生尚未分配专业"));
    };

    let period = match target_period(&storage, enrollment_data.period_id).await? {
        Ok(period) => period,
        Err(resp) => return Ok(resp),
    };

    let Some(detail) = storage.get_subject_detail(enrollment_data.subject_id).await? else {
        return Ok(subject_not_found());
    };
    // 教职工代选时课程必须在其管理范围内
    if student.id != user.id
        && !storage
            .subject_in_scope(scope, enrollment_data.subject_id)
            .await?
    {
        return Ok(subject_not_found());
    }

    if !detail.subject.is_active {
        return Ok(enrollment_not_allowed("课程未启用"));
    }
    if detail.subject.period_id != period.id {
        return Ok(enrollment_not_allowed(format!(
            "课程不属于学期 {}",
            period.name
        )));
    }
    if !detail.careers.iter().any(|c| c.career_id == career_id) {
        return Ok(enrollment_not_allowed("课程不在学生所在专业的培养方案中"));
    }

    if storage
        .find_enrollment(student.id, detail.subject.id, period.id)
        .await?
        .is_some_and(|e| e.status == EnrollmentStatus::Active)
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AlreadyEnrolled,
            "已选过该课程",
        )));
    }

    let enrollment = storage
        .create_enrollment(
            student.id,
            detail.subject.id,
            period.id,
            enrollment_data.schedule.trim(),
        )
        .await?;
    tracing::info!(
        "Student {} enrolled in {} ({}) by {}",
        student.username,
        detail.subject.code,
        period.name,
        user.username
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(enrollment, "选课成功")))
}
