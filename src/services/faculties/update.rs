use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FacultyService, faculty_not_found, validate_faculty_fields};
use crate::errors::AcademiaError;
use crate::models::ApiResponse;
use crate::models::faculties::requests::UpdateFacultyRequest;
use crate::models::roles::entities::perms;
use crate::services::{
    current_scope, current_user, field_error, require_permission, validation_response,
};

pub async fn update_faculty(
    service: &FacultyService,
    faculty_id: i64,
    update_data: UpdateFacultyRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::EDIT_FACULTY)?;
    if !current_scope(request)?.covers_faculty(faculty_id) {
        return Err(AcademiaError::authorization("院系不在管理范围内").into());
    }

    let errors =
        validate_faculty_fields(update_data.name.as_deref(), update_data.code.as_deref());
    if !errors.is_empty() {
        return Ok(validation_response(errors));
    }
    if let Some(coordinator_id) = update_data.coordinator_id
        && storage.get_user_by_id(coordinator_id).await?.is_none()
    {
        return Ok(field_error("coordinator_id", "协调员不存在"));
    }

    match storage.update_faculty(faculty_id, update_data).await? {
        Some(faculty) => Ok(HttpResponse::Ok().json(ApiResponse::success(faculty, "院系已更新"))),
        None => Ok(faculty_not_found()),
    }
}
