pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::errors::Result;
use crate::models::faculties::requests::{
    CreateFacultyRequest, FacultyListParams, UpdateFacultyRequest,
};
use crate::models::{ApiResponse, ErrorCode, FieldErrors};
use crate::storage::Storage;

pub struct FacultyService {
    storage: Option<Arc<dyn Storage>>,
}

impl FacultyService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub async fn list_faculties(
        &self,
        query: FacultyListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_faculties(self, query, request).await
    }

    pub async fn create_faculty(
        &self,
        faculty_data: CreateFacultyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_faculty(self, faculty_data, request).await
    }

    pub async fn get_faculty(
        &self,
        faculty_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_faculty(self, faculty_id, request).await
    }

    pub async fn update_faculty(
        &self,
        faculty_id: i64,
        update_data: UpdateFacultyRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_faculty(self, faculty_id, update_data, request).await
    }

    pub async fn delete_faculty(
        &self,
        faculty_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_faculty(self, faculty_id, request).await
    }
}

pub(crate) fn faculty_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::FacultyNotFound,
        "院系不存在",
    ))
}

/// 名称与代码校验，`None` 表示未修改
pub(crate) fn validate_faculty_fields(name: Option<&str>, code: Option<&str>) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if name.is_some_and(|n| n.trim().is_empty() || n.trim().chars().count() > 100) {
        errors.insert("name".to_string(), "院系名称长度必须在 1-100 之间".to_string());
    }
    if let Some(code) = code {
        let code = code.trim();
        if code.is_empty()
            || code.len() > 20
            || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.insert(
                "code".to_string(),
                "代码只能包含字母、数字、连字符和下划线，长度 1-20".to_string(),
            );
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faculty_fields() {
        assert!(validate_faculty_fields(Some("Ingeniería"), Some("FI-01")).is_empty());
        let errors = validate_faculty_fields(Some("  "), Some("F I"));
        assert_eq!(errors.len(), 2);
        assert!(validate_faculty_fields(None, None).is_empty());
    }
}
