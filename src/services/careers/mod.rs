pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::{AcademiaError, Result};
use crate::models::access::AccessScope;
use crate::models::careers::requests::{CareerListParams, CreateCareerRequest, UpdateCareerRequest};
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::storage::Storage;

pub struct CareerService {
    storage: Option<Arc<dyn Storage>>,
}

impl CareerService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_careers(
        &self,
        query: CareerListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_careers(self, query, request).await
    }

    pub async fn create_career(
        &self,
        career_data: CreateCareerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_career(self, career_data, request).await
    }

    pub async fn get_career(
        &self,
        career_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_career(self, career_id, request).await
    }

    pub async fn update_career(
        &self,
        career_id: i64,
        update_data: UpdateCareerRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_career(self, career_id, update_data, request).await
    }

    pub async fn delete_career(
        &self,
        career_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_career(self, career_id, request).await
    }
}

pub(crate) fn career_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::CareerNotFound,
        "专业不存在",
    ))
}

/// 院系范围外的专业不能修改
pub(crate) fn ensure_faculty_in_scope(scope: &AccessScope, faculty_id: i64) -> Result<()> {
    if scope.covers_faculty(faculty_id) {
        Ok(())
    } else {
        Err(AcademiaError::authorization("专业所属院系不在管理范围内"))
    }
}

pub(crate) fn validate_career_fields(name: Option<&str>, code: Option<&str>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if name.is_some_and(|n| n.trim().is_empty() || n.trim().chars().count() > 150) {
        errors.insert("name".to_string(), "专业名称长度必须在 1-150 之间".to_string());
    }
    if code.is_some_and(|c| {
        let c = c.trim();
        c.is_empty() || c.len() > 20 || c.chars().any(char::is_whitespace)
    }) {
        errors.insert("code".to_string(), "专业代码长度必须在 1-20 之间且不含空格".to_string());
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_check() {
        assert!(ensure_faculty_in_scope(&AccessScope::Everything, 3).is_ok());
        assert!(ensure_faculty_in_scope(&AccessScope::Faculty(Some(3)), 3).is_ok());
        let err = ensure_faculty_in_scope(&AccessScope::Faculty(Some(2)), 3).unwrap_err();
        assert_eq!(err.code(), "E013");
        assert!(ensure_faculty_in_scope(&AccessScope::Teaching(1), 3).is_err());
    }

    #[test]
    fn test_career_fields() {
        assert!(validate_career_fields(Some("Ingeniería de Sistemas"), Some("IS")).is_empty());
        assert!(validate_career_fields(Some(""), None).contains_key("name"));
        assert!(validate_career_fields(None, Some("I S")).contains_key("code"));
    }
}
