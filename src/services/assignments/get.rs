use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_not_found};
use crate::models::ApiResponse;
use crate::services::current_scope;

pub async fn get_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;

    let Some(assignment) = storage.get_assignment_by_id(assignment_id).await? else {
        return Ok(assignment_not_found());
    };
    // 学生看不到草稿
    if (!scope.is_staff() && !assignment.status.is_visible_to_students())
        || !storage.subject_in_scope(scope, assignment.subject_id).await?
    {
        return Ok(assignment_not_found());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(assignment, "查询成功")))
}
