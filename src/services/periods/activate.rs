use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{PeriodService, period_not_found, require_period_admin};
use crate::models::ApiResponse;
use crate::models::periods::requests::ClonePeriodRequest;
use crate::models::roles::entities::perms;
use crate::services::{current_user, field_error, require_permission};

pub async fn activate_period(
    service: &PeriodService,
    period_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_period_admin(&user)?;

    match storage.activate_period(period_id).await? {
        Some(period) => {
            tracing::info!("Period {} activated by {}", period.name, user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success(period, "学期已激活")))
        }
        None => Ok(period_not_found()),
    }
}

/// 把源学期的课程复制到目标学期，已存在的同代码课程只补充培养方案关联
pub async fn clone_period(
    service: &PeriodService,
    period_id: i64,
    clone_data: ClonePeriodRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_period_admin(&user)?;
    require_permission(&user, perms::CREATE_SUBJECT)?;

    if clone_data.target_period_id == period_id {
        return Ok(field_error("target_period_id", "目标学期不能与源学期相同"));
    }
    if storage.get_period_by_id(period_id).await?.is_none() {
        return Ok(period_not_found());
    }
    if storage
        .get_period_by_id(clone_data.target_period_id)
        .await?
        .is_none()
    {
        return Ok(field_error("target_period_id", "目标学期不存在"));
    }

    let result = storage
        .clone_period_subjects(period_id, clone_data.target_period_id)
        .await?;
    tracing::info!(
        "Period {} cloned into {} by {}: {} created, {} reused",
        period_id,
        result.target_period_id,
        user.username,
        result.created,
        result.reused
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success(result, "课程复制完成")))
}
