pub mod summary;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::grades::requests::GradeSummaryParams;
use crate::storage::Storage;

pub struct GradeService {
    storage: Option<Arc<dyn Storage>>,
}

impl GradeService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn get_summary(
        &self,
        query: GradeSummaryParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::get_summary(self, query, request).await
    }

    pub async fn list_subject_summaries(
        &self,
        subject_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        summary::list_subject_summaries(self, subject_id, request).await
    }
}

/// 及格线，配置值无法表示为小数时退回 60
pub(crate) fn pass_threshold() -> Decimal {
    Decimal::try_from(AppConfig::get().academic.pass_threshold).unwrap_or(Decimal::from(60))
}
