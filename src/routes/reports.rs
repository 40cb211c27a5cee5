use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::reports::requests::{
    ExportReportParams, GenerateReportParams, GenerateReportRequest, ReportListParams,
};
use crate::models::users::entities::RoleCode;
use crate::services::ReportService;
use crate::utils::SafeYearMonth;

static REPORT_SERVICE: Lazy<ReportService> = Lazy::new(ReportService::new_lazy);

pub async fn list_reports(
    req: HttpRequest,
    query: web::Query<ReportListParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE.list_reports(query.into_inner(), &req).await
}

// 请求体可省略，默认生成上个月
pub async fn generate_report(
    req: HttpRequest,
    params: web::Query<GenerateReportParams>,
    body: Option<web::Json<GenerateReportRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(|b| b.into_inner()).unwrap_or_default();
    REPORT_SERVICE
        .generate_report(body, params.into_inner(), &req)
        .await
}

pub async fn get_report(req: HttpRequest, period: SafeYearMonth) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .get_report(period.year, period.month, &req)
        .await
}

pub async fn export_report(
    req: HttpRequest,
    period: SafeYearMonth,
    params: web::Query<ExportReportParams>,
) -> ActixResult<HttpResponse> {
    REPORT_SERVICE
        .export_report(period.year, period.month, params.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_report_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/reports/monthly")
            .wrap(middleware::Compress::default())
            .wrap(middlewares::RequireRole::new_any(RoleCode::staff_roles()))
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_reports))
            .service(
                web::resource("/generate")
                    .wrap(RateLimit::report_generation())
                    .route(web::post().to(generate_report)),
            )
            .route("/{year}/{month}", web::get().to(get_report))
            .route("/{year}/{month}/export", web::get().to(export_report)),
    );
}
