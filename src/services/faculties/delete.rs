use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FacultyService, faculty_not_found};
use crate::models::ApiResponse;
use crate::models::roles::entities::perms;
use crate::services::{current_user, require_permission};

pub async fn delete_faculty(
    service: &FacultyService,
    faculty_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::DELETE_FACULTY)?;

    if storage.delete_faculty(faculty_id).await? {
        tracing::info!("Faculty {} deleted by {}", faculty_id, user.username);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("院系已删除")))
    } else {
        Ok(faculty_not_found())
    }
}
