use serde::Deserialize;

use crate::models::common::{PaginationQuery, deserialize_optional_from_str};

#[derive(Debug, Deserialize)]
pub struct FacultyListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct FacultyListQuery {
    pub page: i64,
    pub size: i64,
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFacultyRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub coordinator_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFacultyRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub coordinator_id: Option<i64>,
    pub is_active: Option<bool>,
}
