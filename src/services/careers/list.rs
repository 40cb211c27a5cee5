use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CareerService;
use crate::models::ApiResponse;
use crate::models::careers::requests::{CareerListParams, CareerListQuery};
use crate::services::current_scope;

/// 院系范围内的用户只能看到本院系的专业
pub async fn list_careers(
    service: &CareerService,
    query: CareerListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;
    let (page, size) = query.pagination.normalized();

    let careers = storage
        .list_careers_with_pagination(CareerListQuery {
            page,
            size,
            faculty_id: query.faculty_id,
            scope_faculty: scope.career_faculty_filter(),
            level: query.level,
            search: query.search,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(careers, "查询成功")))
}
