use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PeriodService, period_not_found};
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_period(
    service: &PeriodService,
    period_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_period_by_id(period_id).await? {
        Some(period) => Ok(HttpResponse::Ok().json(ApiResponse::success(period, "查询成功"))),
        None => Ok(period_not_found()),
    }
}

pub async fn get_active_period(
    service: &PeriodService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_active_period().await? {
        Some(period) => Ok(HttpResponse::Ok().json(ApiResponse::success(period, "查询成功"))),
        None => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::NoActivePeriod,
            "当前没有激活的学期",
        ))),
    }
}
