use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, submission_not_found};
use crate::models::ApiResponse;
use crate::services::current_scope;

pub async fn get_submission(
    service: &SubmissionService,
    submission_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;

    let Some(view) = storage.get_submission_view(submission_id).await? else {
        return Ok(submission_not_found());
    };
    let visible = match scope.own_student_id() {
        Some(student_id) => view.submission.student_id == student_id,
        None => storage.subject_in_scope(scope, view.subject_id).await?,
    };
    if !visible {
        return Ok(submission_not_found());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(view, "查询成功")))
}
