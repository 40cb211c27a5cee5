use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubjectService;
use crate::models::ApiResponse;
use crate::models::subjects::requests::{SubjectListParams, SubjectListQuery};
use crate::services::current_scope;

pub async fn list_subjects(
    service: &SubjectService,
    query: SubjectListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;
    let (page, size) = query.pagination.normalized();

    let visible_ids = storage.visible_subject_ids(scope).await?;
    let subjects = storage
        .list_subjects_with_pagination(SubjectListQuery {
            page,
            size,
            period_id: query.period_id,
            career_id: query.career_id,
            search: query.search,
            is_active: query.is_active,
            visible_ids,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(subjects, "查询成功")))
}
