use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::faculties::requests::{
    CreateFacultyRequest, FacultyListParams, UpdateFacultyRequest,
};
use crate::services::FacultyService;
use crate::utils::SafeIDI64;

static FACULTY_SERVICE: Lazy<FacultyService> = Lazy::new(FacultyService::new_lazy);

pub async fn list_faculties(
    req: HttpRequest,
    query: web::Query<FacultyListParams>,
) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE.list_faculties(query.into_inner(), &req).await
}

pub async fn create_faculty(
    req: HttpRequest,
    faculty_data: web::Json<CreateFacultyRequest>,
) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE
        .create_faculty(faculty_data.into_inner(), &req)
        .await
}

pub async fn get_faculty(req: HttpRequest, faculty_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE.get_faculty(faculty_id.0, &req).await
}

pub async fn update_faculty(
    req: HttpRequest,
    faculty_id: SafeIDI64,
    update_data: web::Json<UpdateFacultyRequest>,
) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE
        .update_faculty(faculty_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_faculty(req: HttpRequest, faculty_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FACULTY_SERVICE.delete_faculty(faculty_id.0, &req).await
}

// 配置路由
pub fn configure_faculty_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/faculties")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_faculties))
            .route("", web::post().to(create_faculty))
            .route("/{id}", web::get().to(get_faculty))
            .route("/{id}", web::put().to(update_faculty))
            .route("/{id}", web::delete().to(delete_faculty)),
    );
}
