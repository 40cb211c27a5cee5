use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CareerService, career_not_found};
use crate::models::ApiResponse;
use crate::services::current_scope;

pub async fn get_career(
    service: &CareerService,
    career_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;

    let career = match storage.get_career_by_id(career_id).await? {
        Some(career) => career,
        None => return Ok(career_not_found()),
    };
    // 与列表保持一致，范围外按不存在处理
    if let Some(filter) = scope.career_faculty_filter()
        && filter != Some(career.faculty_id)
    {
        return Ok(career_not_found());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(career, "查询成功")))
}
