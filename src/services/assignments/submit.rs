use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{AssignmentService, assignment_not_found};
use crate::errors::AcademiaError;
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::requests::SubmitAssignmentRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, dispatch_job, field_error};
use crate::tasks::Job;

/// 提交是否被接受，拒绝时返回原因
pub(crate) fn submission_window(
    assignment: &Assignment,
    at: chrono::DateTime<chrono::Utc>,
) -> Result<(), &'static str> {
    match assignment.status {
        AssignmentStatus::Draft => Err("作业尚未发布"),
        AssignmentStatus::Closed => Err("作业已关闭，不再接受提交"),
        AssignmentStatus::Published
            if assignment.is_past_due(at) && !assignment.allow_late_submission =>
        {
            Err("已超过截止时间，该作业不接受迟交")
        }
        AssignmentStatus::Published => Ok(()),
    }
}

/// 学生提交作业，未评分的提交会被替换
pub async fn submit_assignment(
    service: &AssignmentService,
    assignment_id: i64,
    submission_data: SubmitAssignmentRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let user = current_user(request)?;

    let content = submission_data
        .content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());
    let attachment_url = submission_data
        .attachment_url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    if content.is_none() && attachment_url.is_none() {
        return Ok(field_error("content", "提交内容和附件链接不能同时为空"));
    }

    let Some(assignment) = storage.get_assignment_by_id(assignment_id).await? else {
        return Ok(assignment_not_found());
    };
    if !storage
        .is_student_enrolled(user.id, assignment.subject_id)
        .await?
    {
        // 草稿对未选课的人同样不可见
        if !assignment.status.is_visible_to_students() {
            return Ok(assignment_not_found());
        }
        return Err(AcademiaError::authorization("未选修该课程，不能提交作业").into());
    }
    if assignment.status == AssignmentStatus::Draft {
        return Ok(assignment_not_found());
    }

    if let Err(message) = submission_window(&assignment, chrono::Utc::now()) {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::SubmissionClosed,
            message,
        )));
    }

    if let Some(existing) = storage.find_submission(assignment_id, user.id).await?
        && existing.grade.is_some()
    {
        return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::AlreadyGraded,
            "作业已评分，不能重新提交",
        )));
    }

    let submission = storage
        .upsert_submission(assignment_id, user.id, content, attachment_url)
        .await?;
    tracing::info!(
        "Submission {} for assignment {} by {}",
        submission.id,
        assignment_id,
        user.username
    );
    dispatch_job(
        request,
        Job::NewSubmission {
            submission_id: submission.id,
        },
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(submission, "提交成功")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::AssignmentKind;
    use chrono::{Duration, Utc};
    use rust_decimal::dec;

    fn assignment(status: AssignmentStatus, allow_late: bool) -> Assignment {
        let now = Utc::now();
        Assignment {
            id: 1,
            subject_id: 1,
            title: "Parcial 1".to_string(),
            description: None,
            kind: AssignmentKind::Exam,
            weight: dec!(40),
            publish_at: now - Duration::days(10),
            due_at: now - Duration::days(1),
            status,
            allow_late_submission: allow_late,
            created_by: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_late_submission_rules() {
        let now = Utc::now();
        assert!(submission_window(&assignment(AssignmentStatus::Published, false), now).is_err());
        assert!(submission_window(&assignment(AssignmentStatus::Published, true), now).is_ok());
        let before_due = now - Duration::days(2);
        assert!(
            submission_window(&assignment(AssignmentStatus::Published, false), before_due).is_ok()
        );
    }

    #[test]
    fn test_closed_and_draft_refuse() {
        let now = Utc::now();
        assert!(submission_window(&assignment(AssignmentStatus::Closed, true), now).is_err());
        assert!(submission_window(&assignment(AssignmentStatus::Draft, true), now).is_err());
    }
}
