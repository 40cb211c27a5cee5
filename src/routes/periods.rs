use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::periods::requests::{
    ClonePeriodRequest, CreatePeriodRequest, PeriodListParams, UpdatePeriodRequest,
};
use crate::services::PeriodService;
use crate::utils::SafeIDI64;

static PERIOD_SERVICE: Lazy<PeriodService> = Lazy::new(PeriodService::new_lazy);

pub async fn list_periods(
    req: HttpRequest,
    query: web::Query<PeriodListParams>,
) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE.list_periods(query.into_inner(), &req).await
}

pub async fn get_active_period(req: HttpRequest) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE.get_active_period(&req).await
}

pub async fn create_period(
    req: HttpRequest,
    period_data: web::Json<CreatePeriodRequest>,
) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE
        .create_period(period_data.into_inner(), &req)
        .await
}

pub async fn get_period(req: HttpRequest, period_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE.get_period(period_id.0, &req).await
}

pub async fn update_period(
    req: HttpRequest,
    period_id: SafeIDI64,
    update_data: web::Json<UpdatePeriodRequest>,
) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE
        .update_period(period_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_period(req: HttpRequest, period_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE.delete_period(period_id.0, &req).await
}

pub async fn activate_period(req: HttpRequest, period_id: SafeIDI64) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE.activate_period(period_id.0, &req).await
}

pub async fn clone_period(
    req: HttpRequest,
    period_id: SafeIDI64,
    clone_data: web::Json<ClonePeriodRequest>,
) -> ActixResult<HttpResponse> {
    PERIOD_SERVICE
        .clone_period(period_id.0, clone_data.into_inner(), &req)
        .await
}

// 配置路由，/active 必须在 /{id} 之前注册
pub fn configure_period_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/periods")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_periods))
            .route("", web::post().to(create_period))
            .route("/active", web::get().to(get_active_period))
            .route("/{id}", web::get().to(get_period))
            .route("/{id}", web::put().to(update_period))
            .route("/{id}", web::delete().to(delete_period))
            .route("/{id}/activate", web::post().to(activate_period))
            .route("/{id}/clone", web::post().to(clone_period)),
    );
}
