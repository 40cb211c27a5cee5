use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PeriodService, period_not_found, require_period_admin};
use crate::models::ApiResponse;
use crate::models::periods::requests::{UpdatePeriodRequest, validate_period_dates};
use crate::services::{current_user, field_error, validation_response};

pub async fn update_period(
    service: &PeriodService,
    period_id: i64,
    update_data: UpdatePeriodRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_period_admin(&current_user(request)?)?;

    let existing = match storage.get_period_by_id(period_id).await? {
        Some(period) => period,
        None => return Ok(period_not_found()),
    };

    if update_data.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Ok(field_error("name", "学期名称不能为空"));
    }
    // 只改一端时与现有的另一端比较
    let start = update_data.start_date.unwrap_or(existing.start_date);
    let end = update_data.end_date.unwrap_or(existing.end_date);
    if let Err(errors) = validate_period_dates(start, end) {
        return Ok(validation_response(errors));
    }

    match storage.update_period(period_id, update_data).await? {
        Some(period) => Ok(HttpResponse::Ok().json(ApiResponse::success(period, "学期已更新"))),
        None => Ok(period_not_found()),
    }
}
