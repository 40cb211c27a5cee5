use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SubmissionService, submission_not_found};
use crate::errors::AcademiaError;
use crate::models::ApiResponse;
use crate::models::roles::entities::perms;
use crate::models::submissions::requests::{GradeSubmissionRequest, validate_grade};
use crate::services::{current_scope, current_user, require_permission, validation_response};

/// 评分需要 grade_assignment 权限且课程在范围内，修改已有成绩还需要 edit_grades
pub async fn grade_submission(
    service: &SubmissionService,
    submission_id: i64,
    grade_data: GradeSubmissionRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;
    let scope = current_scope(request)?;
    require_permission(&user, perms::GRADE_ASSIGNMENT)?;

    if let Err(errors) = validate_grade(grade_data.grade) {
        return Ok(validation_response(errors));
    }

    let Some(view) = storage.get_submission_view(submission_id).await? else {
        return Ok(submission_not_found());
    };
    if !scope.is_staff() || !storage.subject_in_scope(scope, view.subject_id).await? {
        return Err(AcademiaError::authorization("课程不在评分范围内").into());
    }
    if view.submission.grade.is_some() {
        require_permission(&user, perms::EDIT_GRADES)?;
    }

    let feedback = grade_data
        .feedback
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty());
    match storage
        .grade_submission(submission_id, grade_data.grade, feedback, user.id)
        .await?
    {
        Some(submission) => {
            tracing::info!(
                "Submission {} graded {} by {}",
                submission_id,
                grade_data.grade,
                user.username
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "评分成功")))
        }
        None => Ok(submission_not_found()),
    }
}
