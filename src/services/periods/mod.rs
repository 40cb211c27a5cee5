pub mod activate;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AcademiaError, Result};
use crate::models::periods::requests::{
    ClonePeriodRequest, CreatePeriodRequest, PeriodListParams, UpdatePeriodRequest,
};
use crate::models::roles::entities::RoleCode;
use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct PeriodService {
    storage: Option<Arc<dyn Storage>>,
}

impl PeriodService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_periods(
        &self,
        query: PeriodListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_periods(self, query, request).await
    }

    pub async fn get_active_period(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        get::get_active_period(self, request).await
    }

    pub async fn get_period(
        &self,
        period_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_period(self, period_id, request).await
    }

    pub async fn create_period(
        &self,
        period_data: CreatePeriodRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_period(self, period_data, request).await
    }

    pub async fn update_period(
        &self,
        period_id: i64,
        update_data: UpdatePeriodRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_period(self, period_id, update_data, request).await
    }

    pub async fn delete_period(
        &self,
        period_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_period(self, period_id, request).await
    }

    pub async fn activate_period(
        &self,
        period_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        activate::activate_period(self, period_id, request).await
    }

    pub async fn clone_period(
        &self,
        period_id: i64,
        clone_data: ClonePeriodRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        activate::clone_period(self, period_id, clone_data, request).await
    }
}

pub(crate) fn period_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::PeriodNotFound,
        "学期不存在",
    ))
}

/// 学期是全局数据，只有管理员可以维护
pub(crate) fn require_period_admin(user: &User) -> Result<()> {
    if user.has_any_role(RoleCode::admin_roles()) {
        Ok(())
    } else {
        Err(AcademiaError::authorization("只有管理员可以维护学期"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::fixtures::user;

    #[test]
    fn test_period_admin() {
        assert!(require_period_admin(&user(1, &[RoleCode::Admin])).is_ok());
        assert!(require_period_admin(&user(2, &[RoleCode::SuperAdmin])).is_ok());
        assert!(require_period_admin(&user(3, &[RoleCode::Coordinator])).is_err());
    }
}
