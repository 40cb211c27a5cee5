use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::ApiResponse;
use crate::models::enrollments::requests::{EnrollmentListParams, EnrollmentListQuery};
use crate::services::current_scope;

pub async fn list_enrollments(
    service: &EnrollmentService,
    query: EnrollmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;
    let (page, size) = query.pagination.normalized();

    // 学生只能看到自己的选课
    let student_id = scope.own_student_id().or(query.student_id);
    let visible_ids = storage.visible_subject_ids(scope).await?;

    let enrollments = storage
        .list_enrollments_with_pagination(EnrollmentListQuery {
            page,
            size,
            subject_id: query.subject_id,
            student_id,
            period_id: query.period_id,
            status: query.status,
            visible_ids,
        })
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(enrollments, "查询成功")))
}
