pub mod monthly;
pub mod render;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::reports::requests::{
    ExportReportParams, GenerateReportParams, GenerateReportRequest, ReportListParams,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct ReportService {
    storage: Option<Arc<dyn Storage>>,
}

impl ReportService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_reports(
        &self,
        query: ReportListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        monthly::list_reports(self, query, request).await
    }

    pub async fn generate_report(
        &self,
        body: GenerateReportRequest,
        params: GenerateReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        monthly::generate_report(body, params, request).await
    }

    pub async fn get_report(
        &self,
        year: i32,
        month: u32,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        monthly::get_report(self, year, month, request).await
    }

    pub async fn export_report(
        &self,
        year: i32,
        month: u32,
        params: ExportReportParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        monthly::export_report(self, year, month, params, request).await
    }
}

pub(crate) fn report_not_found(year: i32, month: u32) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::ReportNotFound,
        format!("{year:04}-{month:02} 的月度报告尚未生成"),
    ))
}
