use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FacultyService, validate_faculty_fields};
use crate::models::ApiResponse;
use crate::models::faculties::requests::CreateFacultyRequest;
use crate::models::roles::entities::perms;
use crate::services::{current_user, field_error, require_permission, validation_response};

pub async fn create_faculty(
    service: &FacultyService,
    faculty_data: CreateFacultyRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::CREATE_FACULTY)?;

    let errors = validate_faculty_fields(Some(&faculty_data.name), Some(&faculty_data.code));
    if !errors.is_empty() {
        return Ok(validation_response(errors));
    }
    if let Some(coordinator_id) = faculty_data.coordinator_id
        && storage.get_user_by_id(coordinator_id).await?.is_none()
    {
        return Ok(field_error("coordinator_id", "协调员不存在"));
    }

    // 代码重复时存储层返回 409
    let faculty = storage.create_faculty(faculty_data).await?;
    tracing::info!("Faculty {} created by {}", faculty.code, user.username);

    Ok(HttpResponse::Created().json(ApiResponse::success(faculty, "院系创建成功")))
}
