use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubjectService, ensure_subject_writable, subject_not_found};
use crate::models::ApiResponse;
use crate::models::roles::entities::perms;
use crate::models::subjects::requests::{UpdateSubjectRequest, validate_subject_fields};
use crate::services::{
    current_scope, current_user, dispatch_job, require_permission, validation_response,
};
use crate::tasks::Job;

pub async fn update_subject(
    service: &SubjectService,
    subject_id: i64,
    update_data: UpdateSubjectRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    require_permission(&user, perms::EDIT_SUBJECT)?;

    if storage.get_subject_by_id(subject_id).await?.is_none() {
        return Ok(subject_not_found());
    }
    ensure_subject_writable(&storage, &current_scope(request)?, subject_id).await?;

    if let Err(errors) = validate_subject_fields(
        update_data.name.as_deref(),
        update_data.code.as_deref(),
        update_data.credits,
    ) {
        return Ok(validation_response(errors));
    }

    match storage.update_subject(subject_id, update_data).await? {
        Some(subject) => {
            dispatch_job(
                request,
                Job::SubjectSaved {
                    subject_id,
                    created: false,
                },
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "课程已更新")))
        }
        None => Ok(subject_not_found()),
    }
}
