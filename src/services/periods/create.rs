use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PeriodService, require_period_admin};
use crate::models::ApiResponse;
use crate::models::periods::requests::{CreatePeriodRequest, validate_period_dates};
use crate::services::{current_user, field_error, validation_response};

pub async fn create_period(
    service: &PeriodService,
    period_data: CreatePeriodRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_period_admin(&user)?;

    if period_data.name.trim().is_empty() {
        return Ok(field_error("name", "学期名称不能为空"));
    }
    if let Err(errors) = validate_period_dates(period_data.start_date, period_data.end_date) {
        return Ok(validation_response(errors));
    }

    // 激活新学期时其余学期在同一事务中取消激活
    let period = storage.create_period(period_data).await?;
    tracing::info!(
        "Period {} created by {} (active: {})",
        period.name,
        user.username,
        period.is_active
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(period, "学期创建成功")))
}
