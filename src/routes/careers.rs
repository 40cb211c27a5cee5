use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::careers::requests::{
    CareerListParams, CreateCareerRequest, UpdateCareerRequest,
};
use crate::services::CareerService;
use crate::utils::SafeIDI64;

static CAREER_SERVICE: Lazy<CareerService> = Lazy::new(CareerService::new_lazy);

pub async fn list_careers(
    req: HttpRequest,
    query: web::Query<CareerListParams>,
) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.list_careers(query.into_inner(), &req).await
}

pub async fn create_career(
    req: HttpRequest,
    career_data: web::Json<CreateCareerRequest>,
) -> ActixResult<HttpResponse> {
    CAREER_SERVICE
        .create_career(career_data.into_inner(), &req)
        .await
}

pub async fn get_career(req: HttpRequest, career_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.get_career(career_id.0, &req).await
}

pub async fn update_career(
    req: HttpRequest,
    career_id: SafeIDI64,
    update_data: web::Json<UpdateCareerRequest>,
) -> ActixResult<HttpResponse> {
    CAREER_SERVICE
        .update_career(career_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_career(req: HttpRequest, career_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CAREER_SERVICE.delete_career(career_id.0, &req).await
}

// 配置路由
pub fn configure_career_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/careers")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_careers))
            .route("", web::post().to(create_career))
            .route("/{id}", web::get().to(get_career))
            .route("/{id}", web::put().to(update_career))
            .route("/{id}", web::delete().to(delete_career)),
    );
}
