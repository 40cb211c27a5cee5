use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, ensure_subject_writable, subject_not_found};
use crate::models::roles::entities::{RoleCode, perms};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_scope, current_user, dispatch_job, field_error, require_permission};
use crate::tasks::Job;

pub async fn assign_teacher(
    service: &SubjectService,
    subject_id: i64,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::EDIT_SUBJECT)?;

    if storage.get_subject_by_id(subject_id).await?.is_none() {
        return Ok(subject_not_found());
    }
    ensure_subject_writable(&storage, &current_scope(request)?, subject_id).await?;

    match storage.get_user_by_id(teacher_id).await? {
        Some(teacher) if teacher.has_role(RoleCode::Teacher) => {}
        Some(_) => return Ok(field_error("teacher_id", "该用户不是教师")),
        None => return Ok(field_error("teacher_id", "教师不存在")),
    }

    let created = storage.assign_teacher(subject_id, teacher_id).await?;
    if !created {
        return Ok(HttpResponse::Ok().json(ApiResponse::success_empty("该教师已担任此课程")));
    }

    tracing::info!(
        "Teacher {} assigned to subject {} by {}",
        teacher_id,
        subject_id,
        user.username
    );
    dispatch_job(
        request,
        Job::TeacherAssignment {
            subject_id,
            teacher_id,
            assigned: true,
        },
    );

    let teachers = storage.list_subject_teachers(subject_id).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(teachers, "教师已分配")))
}

pub async fn unassign_teacher(
    service: &SubjectService,
    subject_id: i64,
    teacher_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::EDIT_SUBJECT)?;

    if storage.get_subject_by_id(subject_id).await?.is_none() {
        return Ok(subject_not_found());
    }
    ensure_subject_writable(&storage, &current_scope(request)?, subject_id).await?;

    if !storage.unassign_teacher(subject_id, teacher_id).await? {
        return Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NotFound,
            "该教师未担任此课程",
        )));
    }

    dispatch_job(
        request,
        Job::TeacherAssignment {
            subject_id,
            teacher_id,
            assigned: false,
        },
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("已取消教师分配")))
}
