use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::ApiResponse;
use crate::models::assignments::requests::{AssignmentListParams, AssignmentListQuery};
use crate::services::current_scope;

pub async fn list_assignments(
    service: &AssignmentService,
    query: AssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;
    let (page, size) = query.pagination.normalized();

    let visible_ids = storage.visible_subject_ids(scope).await?;
    let assignments = storage
        .list_assignments_with_pagination(AssignmentListQuery {
            page,
            size,
            subject_id: query.subject_id,
            status: query.status,
            kind: query.kind,
            search: query.search,
            visible_ids,
            hide_drafts: !scope.is_staff(),
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(assignments, "查询成功")))
}
