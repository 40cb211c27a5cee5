use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::errors::AcademiaError;
use crate::models::ApiResponse;
use crate::models::submissions::entities::group_submissions;
use crate::models::submissions::requests::{
    GroupedSubmissionsParams, SubmissionListParams, SubmissionListQuery,
};
use crate::services::current_scope;

pub async fn list_submissions(
    service: &SubmissionService,
    query: SubmissionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;
    let (page, size) = query.pagination.normalized();

    // 学生只能看到自己的提交
    let student_id = scope.own_student_id().or(query.student_id);
    let visible_ids = storage.visible_subject_ids(scope).await?;

    let submissions = storage
        .list_submissions_with_pagination(SubmissionListQuery {
            page,
            size,
            assignment_id: query.assignment_id,
            subject_id: query.subject_id,
            student_id,
            ungraded: query.ungraded,
            visible_ids,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(submissions, "查询成功")))
}

/// 课程 -> 学生 -> 提交 的分组视图，只对教职工开放
pub async fn list_grouped(
    service: &SubmissionService,
    query: GroupedSubmissionsParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;
    if !scope.is_staff() {
        return Err(AcademiaError::authorization("只有教职工可以查看分组视图").into());
    }

    let visible_ids = storage.visible_subject_ids(scope).await?;
    let rows = storage
        .list_submission_views(visible_ids, query.subject_id, query.assignment_id)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(group_submissions(rows), "查询成功")))
}
