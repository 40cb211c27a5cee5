use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_not_found, ensure_subject_manageable, invalid_transition};
use crate::models::ApiResponse;
use crate::services::{current_scope, current_user};

/// 已关闭的作业保存着最终成绩，不能删除
pub async fn delete_assignment(
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
    if !assignment.status.is_editable() {
        return Ok(invalid_transition("已关闭的作业不能删除"));
    }

    if storage.delete_assignment(assignment_id).await? {
        tracing::info!("Assignment {} deleted by {}", assignment_id, user.username);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("作业已删除")))
    } else {
        Ok(assignment_not_found())
    }
}
