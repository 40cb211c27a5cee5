//! 月度学业报告

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use serde::Serialize;

use super::render::{ReportFormat, render, report_filename};
use super::{ReportService, report_not_found};
use crate::errors::AcademiaError;
use crate::models::reports::entities::{month_window, previous_month};
use crate::models::reports::requests::{
    ExportReportParams, GenerateReportParams, GenerateReportRequest, ReportListParams,
};
use crate::models::roles::entities::perms;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, field_error, require_permission};
use crate::tasks::{Job, TaskQueue};

#[derive(Debug, Serialize)]
struct GenerateAccepted {
    year: i32,
    month: u32,
    force_resend: bool,
}

fn require_report_viewer(user: &User) -> crate::errors::Result<()> {
    if user.has_permission(perms::VIEW_ACADEMIC_REPORTS)
        || user.has_permission(perms::VIEW_GENERAL_REPORTS)
    {
        Ok(())
    } else {
        Err(AcademiaError::authorization("没有查看报告的权限"))
    }
}

pub async fn list_reports(
    service: &ReportService,
    query: ReportListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_report_viewer(&current_user(request)?)?;

    let reports = storage.list_monthly_reports(query.year).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(reports, "查询成功")))
}

/// 提交生成任务，默认上个月，立即返回 202
pub async fn generate_report(
    body: GenerateReportRequest,
    params: GenerateReportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    require_permission(&user, perms::VIEW_ACADEMIC_REPORTS)?;

    let (default_year, default_month) = previous_month(chrono::Utc::now().date_naive());
    let year = body.year.unwrap_or(default_year);
    let month = body.month.unwrap_or(default_month);
    if month_window(year, month).is_none() {
        return Ok(field_error("month", "月份必须在 1-12 之间"));
    }

    let queue = request
        .app_data::<web::Data<TaskQueue>>()
        .ok_or_else(|| AcademiaError::task_queue("Task queue not configured"))?;
    queue.enqueue(Job::MonthlyReport {
        year,
        month,
        force_resend: params.resend,
    })?;
    tracing::info!(
        "Monthly report {:04}-{:02} requested by {} (resend: {})",
        year,
        month,
        user.username,
        params.resend
    );

    Ok(HttpResponse::Accepted().json(ApiResponse::success(
        GenerateAccepted {
            year,
            month,
            force_resend: params.resend,
        },
        "报告生成任务已提交",
    )))
}

pub async fn get_report(
    service: &ReportService,
    year: i32,
    month: u32,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_report_viewer(&current_user(request)?)?;

    match storage.get_monthly_report(year, month).await? {
        Some(report) => Ok(HttpResponse::Ok().json(ApiResponse::success(report, "查询成功"))),
        None => Ok(report_not_found(year, month)),
    }
}

/// 导出为 HTML、XLSX 或 PDF 文件
pub async fn export_report(
    service: &ReportService,
    year: i32,
    month: u32,
    params: ExportReportParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    require_permission(&current_user(request)?, perms::EXPORT_REPORTS)?;

    let Some(format) = ReportFormat::parse(params.format.as_deref()) else {
        return Ok(field_error("format", "支持的格式: html, xlsx, pdf"));
    };
    let Some(report) = storage.get_monthly_report(year, month).await? else {
        return Ok(report_not_found(year, month));
    };

    let bytes = match render(&report.data, format) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!("Failed to export report {:04}-{:02}: {}", year, month, e);
            return Ok(HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::ExportFailed,
                format!("报告导出失败: {e}"),
            )));
        }
    };

    Ok(HttpResponse::Ok()
        .content_type(format.content_type())
        .insert_header((
            "Content-Disposition",
            format!(
                "attachment; filename=\"{}\"",
                report_filename(&report.data, format)
            ),
        ))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roles::entities::RoleCode;
    use crate::models::users::entities::fixtures::user;

    #[test]
    fn test_report_viewer_permissions() {
        let mut u = user(1, &[RoleCode::Coordinator]);
        assert!(require_report_viewer(&u).is_err());
        u.permissions = vec![perms::VIEW_GENERAL_REPORTS.to_string()];
        assert!(require_report_viewer(&u).is_ok());
    }
}
