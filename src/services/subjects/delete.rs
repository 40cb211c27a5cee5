use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, ensure_subject_writable, subject_not_found};
use crate::models::ApiResponse;
use crate::models::roles::entities::perms;
use crate::services::{current_scope, current_user, require_permission};

pub async fn delete_subject(
    service: &SubjectService,
    subject_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::DELETE_SUBJECT)?;

    let Some(subject) = storage.get_subject_by_id(subject_id).await? else {
        return Ok(subject_not_found());
    };
    ensure_subject_writable(&storage, &current_scope(request)?, subject_id).await?;

    // 作业、提交和选课记录随外键级联删除
    if storage.delete_subject(subject_id).await? {
        tracing::info!("Subject {} deleted by {}", subject.code, user.username);
        Ok(HttpResponse::Ok().json(ApiResponse::success_empty("课程已删除")))
    } else {
        Ok(subject_not_found())
    }
}
