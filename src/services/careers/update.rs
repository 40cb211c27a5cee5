use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CareerService, career_not_found, ensure_faculty_in_scope, validate_career_fields};
use crate::models::ApiResponse;
use crate::models::careers::requests::UpdateCareerRequest;
use crate::models::roles::entities::perms;
use crate::services::{
    current_scope, current_user, field_error, require_permission, validation_response,
};

pub async fn update_career(
    service: &CareerService,
    career_id: i64,
    update_data: UpdateCareerRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::EDIT_CAREER)?;
    let scope = current_scope(request)?;

    let existing = match storage.get_career_by_id(career_id).await? {
        Some(career) => career,
        None => return Ok(career_not_found()),
    };
    ensure_faculty_in_scope(&scope, existing.faculty_id)?;

    let errors = validate_career_fields(update_data.name.as_deref(), update_data.code.as_deref());
    if !errors.is_empty() {
        return Ok(validation_response(errors));
    }
    // 转到其他院系时目标院系同样要在范围内
    if let Some(faculty_id) = update_data.faculty_id
        && faculty_id != existing.faculty_id
    {
        ensure_faculty_in_scope(&scope, faculty_id)?;
        if storage.get_faculty_by_id(faculty_id).await?.is_none() {
            return Ok(field_error("faculty_id", "院系不存在"));
        }
    }

    match storage.update_career(career_id, update_data).await? {
        Some(career) => Ok(HttpResponse::Ok().json(ApiResponse::success(career, "专业已更新"))),
        None => Ok(career_not_found()),
    }
}
