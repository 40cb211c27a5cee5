use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::PeriodService;
use crate::models::ApiResponse;
use crate::models::periods::requests::{PeriodListParams, PeriodListQuery};

pub async fn list_periods(
    service: &PeriodService,
    query: PeriodListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let (page, size) = query.pagination.normalized();

    let periods = storage
        .list_periods_with_pagination(PeriodListQuery {
            page,
            size,
            is_active: query.is_active,
            search: query.search,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(periods, "查询成功")))
}
