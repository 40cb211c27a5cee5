use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CareerService, ensure_faculty_in_scope, validate_career_fields};
use crate::models::ApiResponse;
use crate::models::careers::requests::CreateCareerRequest;
use crate::models::roles::entities::perms;
use crate::services::{
    current_scope, current_user, field_error, require_permission, validation_response,
};

pub async fn create_career(
    service: &CareerService,
    career_data: CreateCareerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::CREATE_CAREER)?;
    ensure_faculty_in_scope(&current_scope(request)?, career_data.faculty_id)?;

    let errors = validate_career_fields(Some(&career_data.name), Some(&career_data.code));
    if !errors.is_empty() {
        return Ok(validation_response(errors));
    }
    if storage.get_faculty_by_id(career_data.faculty_id).await?.is_none() {
        return Ok(field_error("faculty_id", "院系不存在"));
    }

    let career = storage.create_career(career_data).await?;
    tracing::info!("Career {} created by {}", career.code, user.username);

    Ok(HttpResponse::Created().json(ApiResponse::success(career, "专业创建成功")))
}
