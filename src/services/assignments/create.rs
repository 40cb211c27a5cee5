use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, check_budget, ensure_subject_manageable};
use crate::models::ApiResponse;
use crate::models::assignments::requests::{CreateAssignmentRequest, validate_assignment_fields};
use crate::services::subjects::subject_not_found;
use crate::services::{current_scope, current_user, field_error, validation_response};
use crate::storage::NewAssignment;

/// 新建的作业总是草稿
pub async fn create_assignment(
    service: &AssignmentService,
    assignment_data: CreateAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;

    if storage
        .get_subject_by_id(assignment_data.subject_id)
        .await?
        .is_none()
    {
        return Ok(subject_not_found());
    }
    ensure_subject_manageable(&storage, scope, assignment_data.subject_id).await?;

    if let Err(errors) = validate_assignment_fields(
        &assignment_data.title,
        assignment_data.weight,
        assignment_data.publish_at,
        assignment_data.due_at,
    ) {
        return Ok(validation_response(errors));
    }
    let title = assignment_data.title.trim().to_string();
    if storage
        .assignment_title_exists(assignment_data.subject_id, &title, None)
        .await?
    {
        return Ok(field_error("title", "同一课程下已有同名作业"));
    }
    if let Some(resp) = check_budget(
        &storage,
        assignment_data.subject_id,
        None,
        assignment_data.weight,
    )
    .await?
    {
        return Ok(resp);
    }

    let assignment = storage
        .create_assignment(NewAssignment {
            subject_id: assignment_data.subject_id,
            title,
            description: assignment_data.description,
            kind: assignment_data.kind.to_string(),
            weight: assignment_data.weight,
            publish_at: assignment_data.publish_at,
            due_at: assignment_data.due_at,
            allow_late_submission: assignment_data.allow_late_submission,
            created_by: user.id,
        })
        .await?;
    tracing::info!(
        "Assignment {} created for subject {} by {}",
        assignment.id,
        assignment.subject_id,
        user.username
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(assignment, "作业创建成功")))
}
