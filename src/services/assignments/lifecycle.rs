//! 作业状态流转：draft -> published -> closed

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    AssignmentService, assignment_not_found, check_budget, ensure_subject_manageable,
    invalid_transition,
};
use crate::models::ApiResponse;
use crate::models::assignments::reminders::plan_reminders;
use crate::services::{current_scope, current_user, dispatch_job};
use crate::tasks::Job;

/// 发布作业：校验权重预算、安排截止提醒并通知学生
pub async fn publish_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;

    let Some(assignment) = storage.get_assignment_by_id(assignment_id).await? else {
        return Ok(assignment_not_found());
    };
    ensure_subject_manageable(&storage, scope, assignment.subject_id).await?;

    let next = match assignment.status.publish() {
        Ok(next) => next,
        Err(message) => return Ok(invalid_transition(message)),
    };
    if let Some(resp) = check_budget(
        &storage,
        assignment.subject_id,
        Some(assignment_id),
        assignment.weight,
    )
    .await?
    {
        return Ok(resp);
    }

    let Some(published) = storage.set_assignment_status(assignment_id, next).await? else {
        return Ok(assignment_not_found());
    };

    let plan = plan_reminders(published.due_at, chrono::Utc::now());
    let scheduled = storage.schedule_reminders(assignment_id, &plan).await?;
    tracing::info!(
        "Assignment {} published by {}, {} reminder(s) scheduled",
        assignment_id,
        user.username,
        scheduled
    );
    dispatch_job(request, Job::AssignmentPublished { assignment_id });

    Ok(HttpResponse::Ok().json(ApiResponse::success(published, "作业已发布")))
}

pub async fn close_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;

    let Some(assignment) = storage.get_assignment_by_id(assignment_id).await? else {
        return Ok(assignment_not_found());
    };
    ensure_subject_manageable(&storage, scope, assignment.subject_id).await?;

    let next = match assignment.status.close() {
        Ok(next) => next,
        Err(message) => return Ok(invalid_transition(message)),
    };

    match storage.set_assignment_status(assignment_id, next).await? {
        Some(closed) => {
            tracing::info!("Assignment {} closed by {}", assignment_id, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success(closed, "作业已关闭")))
        }
        None => Ok(assignment_not_found()),
    }
}
