use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::subjects::requests::{
    AssignTeacherRequest, CreateSubjectRequest, SetPrerequisitesRequest,
    SetSubjectCareersRequest, SubjectImportParams, SubjectListParams, TemplateParams,
    UpdateSubjectRequest,
};
use crate::services::SubjectService;
use crate::utils::{SafeIDI64, SafeTeacherIdI64};

static SUBJECT_SERVICE: Lazy<SubjectService> = Lazy::new(SubjectService::new_lazy);

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectListParams>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.list_subjects(query.into_inner(), &req).await
}

pub async fn create_subject(
    req: HttpRequest,
    subject_data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .create_subject(subject_data.into_inner(), &req)
        .await
}

pub async fn get_subject(req: HttpRequest, subject_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.get_subject(subject_id.0, &req).await
}

pub async fn update_subject(
    req: HttpRequest,
    subject_id: SafeIDI64,
    update_data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .update_subject(subject_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_subject(req: HttpRequest, subject_id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.delete_subject(subject_id.0, &req).await
}

pub async fn set_careers(
    req: HttpRequest,
    subject_id: SafeIDI64,
    plan_data: web::Json<SetSubjectCareersRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .set_careers(subject_id.0, plan_data.into_inner(), &req)
        .await
}

pub async fn set_prerequisites(
    req: HttpRequest,
    subject_id: SafeIDI64,
    prerequisite_data: web::Json<SetPrerequisitesRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .set_prerequisites(subject_id.0, prerequisite_data.into_inner(), &req)
        .await
}

pub async fn assign_teacher(
    req: HttpRequest,
    subject_id: SafeIDI64,
    teacher_data: web::Json<AssignTeacherRequest>,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .assign_teacher(subject_id.0, teacher_data.into_inner(), &req)
        .await
}

pub async fn unassign_teacher(
    req: HttpRequest,
    subject_id: SafeIDI64,
    teacher_id: SafeTeacherIdI64,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .unassign_teacher(subject_id.0, teacher_id.0, &req)
        .await
}

pub async fn import_subjects(
    req: HttpRequest,
    params: web::Query<SubjectImportParams>,
    payload: actix_multipart::Multipart,
) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE
        .import_subjects(params.into_inner(), payload, &req)
        .await
}

pub async fn download_template(params: web::Query<TemplateParams>) -> ActixResult<HttpResponse> {
    SUBJECT_SERVICE.download_template(params.into_inner()).await
}

// 配置路由，/import 必须在 /{id} 之前注册
pub fn configure_subject_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_subjects))
            .route("", web::post().to(create_subject))
            .service(
                web::resource("/import")
                    .wrap(RateLimit::import())
                    .route(web::post().to(import_subjects)),
            )
            .route("/import/template", web::get().to(download_template))
            .route("/{id}", web::get().to(get_subject))
            .route("/{id}", web::put().to(update_subject))
            .route("/{id}", web::delete().to(delete_subject))
            .route("/{id}/careers", web::put().to(set_careers))
            .route("/{id}/prerequisites", web::put().to(set_prerequisites))
            .route("/{id}/teachers", web::post().to(assign_teacher))
            .route(
                "/{id}/teachers/{teacher_id}",
                web::delete().to(unassign_teacher),
            ),
    );
}
