use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{FacultyService, faculty_not_found};
use crate::models::ApiResponse;

pub async fn get_faculty(
    service: &FacultyService,
    faculty_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    match storage.get_faculty_by_id(faculty_id).await? {
        Some(faculty) => Ok(HttpResponse::Ok().json(ApiResponse::success(faculty, "查询成功"))),
        None => Ok(faculty_not_found()),
    }
}
