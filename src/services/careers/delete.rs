use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CareerService, career_not_found, ensure_faculty_in_scope};
use crate::models::ApiResponse;
use crate::models::roles::entities::perms;
use crate::services::{current_scope, current_user, require_permission};

pub async fn delete_career(
    service: &CareerService,
    career_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::DELETE_CAREER)?;

    let career = match storage.get_career_by_id(career_id).await? {
        Some(career) => career,
        None => return Ok(career_not_found()),
    };
    ensure_faculty_in_scope(&current_scope(request)?, career.faculty_id)?;

    if storage.delete_career(career_id).await? {
        tracing::info!("Career {} deleted by {}", career.code, user.username);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("专业已删除")))
    } else {
        Ok(career_not_found())
    }
}
