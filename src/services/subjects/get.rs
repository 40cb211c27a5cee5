use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, subject_not_found};
use crate::models::ApiResponse;
use crate::services::current_scope;

/// 范围外的课程按不存在处理
pub async fn get_subject(
    service: &SubjectService,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;

    if !storage.subject_in_scope(scope, subject_id).await? {
        return Ok(subject_not_found());
    }

    match storage.get_subject_detail(subject_id).await? {
        Some(detail) => Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "查询成功"))),
        None => Ok(subject_not_found()),
    }
}
