use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PeriodService, period_not_found, require_period_admin};
use crate::models::ApiResponse;
use crate::services::current_user;

/// 仍有课程的学期由存储层返回 409
pub async fn delete_period(
    service: &PeriodService,
    period_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_period_admin(&user)?;

    if storage.delete_period(period_id).await? {
        tracing::info!("Period {} deleted by {}", period_id, user.username);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("学期已删除")))
    } else {
        Ok(period_not_found())
    }
}
