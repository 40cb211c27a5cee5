use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::grades::requests::GradeSummaryParams;
use crate::models::roles::entities::perms;
use crate::services::GradeService;
use crate::utils::SafeSubjectIdI64;

static GRADE_SERVICE: Lazy<GradeService> = Lazy::new(GradeService::new_lazy);

pub async fn get_summary(
    req: HttpRequest,
    query: web::Query<GradeSummaryParams>,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE.get_summary(query.into_inner(), &req).await
}

pub async fn list_subject_summaries(
    req: HttpRequest,
    subject_id: SafeSubjectIdI64,
) -> ActixResult<HttpResponse> {
    GRADE_SERVICE
        .list_subject_summaries(subject_id.0, &req)
        .await
}

// 配置路由
pub fn configure_grade_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequirePermission::new(perms::VIEW_GRADES))
            .wrap(middlewares::RequireJWT)
            .route("/summary", web::get().to(get_summary))
            .route(
                "/subjects/{subject_id}",
                web::get().to(list_subject_summaries),
            ),
    );
}
