pub mod create;
pub mod delete;
pub mod get;
pub mod lifecycle;
pub mod list;
pub mod submit;
pub mod update;
pub mod weights;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::errors::{AcademiaError, Result};
use crate::models::access::AccessScope;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, SubmitAssignmentRequest,
    UpdateAssignmentRequest, WeightsParams,
};
use crate::models::assignments::weights::check_weight_budget;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct AssignmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_assignments(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, query, request).await
    }

    pub async fn create_assignment(
        &self,
        assignment_data: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, assignment_data, request).await
    }

    pub async fn get_weights(
        &self,
        query: WeightsParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        weights::get_weights(self, query, request).await
    }

    pub async fn get_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_assignment(self, assignment_id, request).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, assignment_id, update_data, request).await
    }

    pub async fn delete_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, assignment_id, request).await
    }

    pub async fn publish_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lifecycle::publish_assignment(self, assignment_id, request).await
    }

    pub async fn close_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        lifecycle::close_assignment(self, assignment_id, request).await
    }

    pub async fn submit_assignment(
        &self,
        assignment_id: i64,
        submission_data: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit_assignment(self, assignment_id, submission_data, request).await
    }
}

pub(crate) fn assignment_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::AssignmentNotFound,
        "作业不存在",
    ))
}

pub(crate) fn invalid_transition(message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::InvalidStateTransition,
        message,
    ))
}

/// 作业写操作只对教职工开放，且课程在其范围内
pub(crate) async fn ensure_subject_manageable(
    storage: &Arc<dyn Storage>,
    scope: AccessScope,
    subject_id: i64,
) -> Result<()> {
    if !scope.is_staff() {
        return Err(AcademiaError::authorization("学生不能管理作业"));
    }
    if storage.subject_in_scope(scope, subject_id).await? {
        Ok(())
    } else {
        Err(AcademiaError::authorization("课程不在管理范围内"))
    }
}

/// 校验课程权重预算，超出时返回 400 响应
pub(crate) async fn check_budget(
    storage: &Arc<dyn Storage>,
    subject_id: i64,
    exclude: Option<i64>,
    requested: Decimal,
) -> Result<Option<HttpResponse>> {
    let other_total = storage.subject_weight_total(subject_id, exclude).await?;
    Ok(check_weight_budget(other_total, requested).err().map(|e| {
        HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::WeightBudgetExceeded,
            e.to_string(),
        ))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_responses() {
        assert_eq!(assignment_not_found().status(), 404);
        assert_eq!(invalid_transition("x").status(), 400);
    }
}
