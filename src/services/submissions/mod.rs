pub mod get;
pub mod grade;
pub mod list;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::submissions::requests::{
    GradeSubmissionRequest, GroupedSubmissionsParams, SubmissionListParams,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_submissions(
        &self,
        query: SubmissionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_submissions(self, query, request).await
    }

    pub async fn list_grouped(
        &self,
        query: GroupedSubmissionsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_grouped(self, query, request).await
    }

    pub async fn get_submission(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_submission(self, submission_id, request).await
    }

    pub async fn grade_submission(
        &self,
        submission_id: i64,
        grade_data: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, submission_id, grade_data, request).await
    }
}

pub(crate) fn submission_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::SubmissionNotFound,
        "提交不存在",
    ))
}
