use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, enrollment_not_allowed, resolve_student};
use crate::models::enrollments::requests::AvailableSubjectsParams;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_scope, current_user, field_error};

/// 学生所在专业在当前学期中尚未选的课程
pub async fn list_available(
    service: &EnrollmentService,
    query: AvailableSubjectsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;

    let Some(student) = resolve_student(&storage, &user, &scope, query.student_id).await? else {
        return Ok(field_error("student_id", "学生不存在或未激活"));
    };
    let Some(career_id) = student.career_id else {
        return Ok(enrollment_not_allowed("学生尚未分配专业"));
    };
    let Some(period) = storage.get_active_period().await? else {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NoActivePeriod,
            "当前没有激活的学期",
        )));
    };

    let subjects = storage
        .list_available_subjects(student.id, career_id, period.id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(subjects, "查询成功")))
}
