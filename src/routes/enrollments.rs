use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{
    AvailableSubjectsParams, CreateEnrollmentRequest, EnrollmentListParams,
};
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(query.into_inner(), &req)
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    enrollment_data: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(enrollment_data.into_inner(), &req)
        .await
}

pub async fn list_available(
    req: HttpRequest,
    query: web::Query<AvailableSubjectsParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_available(query.into_inner(), &req)
        .await
}

pub async fn get_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_enrollment(enrollment_id.0, &req).await
}

pub async fn withdraw_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .withdraw_enrollment(enrollment_id.0, &req)
        .await
}

pub async fn delete_enrollment(
    req: HttpRequest,
    enrollment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .delete_enrollment(enrollment_id.0, &req)
        .await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_enrollments))
            .route("", web::post().to(create_enrollment))
            .route("/available", web::get().to(list_available))
            .route("/{id}", web::get().to(get_enrollment))
            .route("/{id}", web::delete().to(delete_enrollment))
            .route("/{id}/withdraw", web::post().to(withdraw_enrollment)),
    );
}
