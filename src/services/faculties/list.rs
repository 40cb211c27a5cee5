use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::FacultyService;
use crate::models::ApiResponse;
use crate::models::faculties::requests::{FacultyListParams, FacultyListQuery};

/// 院系目录对所有登录用户可见
pub async fn list_faculties(
    service: &FacultyService,
    query: FacultyListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = query.pagination.normalized();

    let faculties = storage
        .list_faculties_with_pagination(FacultyListQuery {
            page,
            size,
            search: query.search,
            is_active: query.is_active,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(faculties, "查询成功")))
}
