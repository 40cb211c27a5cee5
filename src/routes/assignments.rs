use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, SubmitAssignmentRequest,
    UpdateAssignmentRequest, WeightsParams,
};
use crate::services::AssignmentService;
use crate::utils::SafeIDI64;

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(query.into_inner(), &req)
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(assignment_data.into_inner(), &req)
        .await
}

pub async fn get_weights(
    req: HttpRequest,
    query: web::Query<WeightsParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_weights(query.into_inner(), &req).await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_assignment(assignment_id.0, &req).await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    update_data: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(assignment_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(assignment_id.0, &req)
        .await
}

pub async fn publish_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .publish_assignment(assignment_id.0, &req)
        .await
}

pub async fn close_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.close_assignment(assignment_id.0, &req).await
}

pub async fn submit_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    submission_data: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .submit_assignment(assignment_id.0, submission_data.into_inner(), &req)
        .await
}

// 配置路由，/weights 必须在 /{id} 之前注册
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/assignments")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_assignments))
            .route("", web::post().to(create_assignment))
            .route("/weights", web::get().to(get_weights))
            .route("/{id}", web::get().to(get_assignment))
            .route("/{id}", web::put().to(update_assignment))
            .route("/{id}", web::delete().to(delete_assignment))
            .route("/{id}/publish", web::post().to(publish_assignment))
            .route("/{id}/close", web::post().to(close_assignment))
            .route("/{id}/submissions", web::post().to(submit_assignment)),
    );
}
