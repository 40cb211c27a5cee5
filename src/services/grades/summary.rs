use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{GradeService, pass_threshold};
use crate::errors::AcademiaError;
use crate::models::grades::entities::GradeSummary;
use crate::models::grades::requests::GradeSummaryParams;
use crate::models::roles::entities::perms;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::subjects::subject_not_found;
use crate::services::{current_scope, current_user, field_error, require_permission};

/// 单个学生在某门课程的加权成绩
///
/// 学生只能查询自己；教职工需要指定范围内课程的学生
pub async fn get_summary(
    service: &GradeService,
    query: GradeSummaryParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;
    require_permission(&user, perms::VIEW_GRADES)?;

    let student_id = match scope.own_student_id() {
        Some(own) => {
            if query.student_id.is_some_and(|id| id != own) {
                return Err(AcademiaError::authorization("只能查询自己的成绩").into());
            }
            own
        }
        None => match query.student_id {
            Some(id) => id,
            None => return Ok(field_error("student_id", "请指定学生")),
        },
    };

    if storage.get_subject_by_id(query.subject_id).await?.is_none()
        || !storage.subject_in_scope(scope, query.subject_id).await?
    {
        return Ok(subject_not_found());
    }
    if !storage
        .is_student_enrolled(student_id, query.subject_id)
        .await?
    {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::EnrollmentNotFound,
            "该学生未选修此课程",
        )));
    }

    let items = storage.list_grade_items(query.subject_id, student_id).await?;
    let summary = GradeSummary::compute(student_id, query.subject_id, items, pass_threshold());

    Ok(HttpResponse::Ok().json(ApiResponse::success(summary, "查询成功")))
}

/// 课程全部在读学生的成绩汇总，只对教职工开放
pub async fn list_subject_summaries(
    service: &GradeService,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;
    require_permission(&user, perms::VIEW_GRADES)?;
    if !scope.is_staff() {
        return Err(AcademiaError::authorization("只有教职工可以查看课程成绩").into());
    }

    if storage.get_subject_by_id(subject_id).await?.is_none()
        || !storage.subject_in_scope(scope, subject_id).await?
    {
        return Ok(subject_not_found());
    }

    let threshold = pass_threshold();
    let students = storage.list_subject_students(subject_id).await?;
    let mut summaries = Vec::with_capacity(students.len());
    for student in students {
        let items = storage.list_grade_items(subject_id, student.id).await?;
        summaries.push(GradeSummary::compute(student.id, subject_id, items, threshold));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(summaries, "查询成功")))
}
