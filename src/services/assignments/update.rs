use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{
    AssignmentService, assignment_not_found, check_budget, ensure_subject_manageable,
    invalid_transition,
};
use crate::models::ApiResponse;
use crate::models::assignments::entities::AssignmentStatus;
use crate::models::assignments::reminders::plan_reminders;
use crate::models::assignments::requests::{UpdateAssignmentRequest, validate_assignment_fields};
use crate::services::{current_scope, field_error, validation_response};
use crate::storage::AssignmentChanges;

/// 修改作业，已发布作业改截止时间时重新安排未发送的提醒
pub async fn update_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    update_data: UpdateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;

    let Some(existing) = storage.get_assignment_by_id(assignment_id).await? else {
        return Ok(assignment_not_found());
    };
    ensure_subject_manageable(&storage, scope, existing.subject_id).await?;
    if !existing.status.is_editable() {
        return Ok(invalid_transition("已关闭的作业不能修改"));
    }

    let changes = AssignmentChanges {
        title: update_data
            .title
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| existing.title.clone()),
        description: update_data.description.or(existing.description.clone()),
        kind: update_data.kind.unwrap_or(existing.kind).to_string(),
        weight: update_data.weight.unwrap_or(existing.weight),
        publish_at: update_data.publish_at.unwrap_or(existing.publish_at),
        due_at: update_data.due_at.unwrap_or(existing.due_at),
        allow_late_submission: update_data
            .allow_late_submission
            .unwrap_or(existing.allow_late_submission),
    };

    if let Err(errors) = validate_assignment_fields(
        &changes.title,
        changes.weight,
        changes.publish_at,
        changes.due_at,
    ) {
        return Ok(validation_response(errors));
    }
    if !changes.title.eq_ignore_ascii_case(&existing.title)
        && storage
            .assignment_title_exists(existing.subject_id, &changes.title, Some(assignment_id))
            .await?
    {
        return Ok(field_error("title", "同一课程下已有同名作业"));
    }
    if changes.weight != existing.weight
        && let Some(resp) =
            check_budget(&storage, existing.subject_id, Some(assignment_id), changes.weight)
                .await?
    {
        return Ok(resp);
    }

    let due_changed = changes.due_at != existing.due_at;
    let Some(assignment) = storage.update_assignment(assignment_id, changes).await? else {
        return Ok(assignment_not_found());
    };

    if due_changed && assignment.status == AssignmentStatus::Published {
        let plan = plan_reminders(assignment.due_at, chrono::Utc::now());
        let scheduled = storage.schedule_reminders(assignment_id, &plan).await?;
        tracing::info!(
            "Assignment {} due date changed, {} reminder(s) rescheduled",
            assignment_id,
            scheduled
        );
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "作业已更新")))
}
