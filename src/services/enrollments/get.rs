use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EnrollmentService, enrollment_not_found};
use crate::models::ApiResponse;
use crate::services::current_scope;

pub async fn get_enrollment(
    service: &EnrollmentService,
    enrollment_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let scope = current_scope(request)?;

    let Some(detail) = storage.get_enrollment_by_id(enrollment_id).await? else {
        return Ok(enrollment_not_found());
    };

    let visible = match scope.own_student_id() {
        Some(student_id) => detail.enrollment.student_id == student_id,
        None => {
            storage
                .subject_in_scope(scope, detail.enrollment.subject_id)
                .await?
        }
    };
    if !visible {
        return Ok(enrollment_not_found());
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(detail, "查询成功")))
}
