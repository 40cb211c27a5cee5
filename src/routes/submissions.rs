use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::submissions::requests::{
    GradeSubmissionRequest, GroupedSubmissionsParams, SubmissionListParams,
};
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(query.into_inner(), &req)
        .await
}

pub async fn list_grouped(
    req: HttpRequest,
    query: web::Query<GroupedSubmissionsParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.list_grouped(query.into_inner(), &req).await
}

pub async fn get_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(submission_id.0, &req).await
}

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
    grade_data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .grade_submission(submission_id.0, grade_data.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_submissions))
            .route("/grouped", web::get().to(list_grouped))
            .route("/{id}", web::get().to(get_submission))
            .route("/{id}/grade", web::put().to(grade_submission)),
    );
}
