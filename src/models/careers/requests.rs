use serde::Deserialize;

use super::entities::{CareerLevel, CareerModality};
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};

#[derive(Debug, Deserialize)]
pub struct CareerListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub faculty_id: Option<i64>,
    pub level: Option<CareerLevel>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CareerListQuery {
    pub page: i64,
    pub size: i64,
    pub faculty_id: Option<i64>,
    /// 访问范围限定的院系；`Some(None)` 表示没有可见数据
    pub scope_faculty: Option<Option<i64>>,
    pub level: Option<CareerLevel>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCareerRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub level: CareerLevel,
    pub modality: CareerModality,
    pub faculty_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCareerRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub level: Option<CareerLevel>,
    pub modality: Option<CareerModality>,
    pub faculty_id: Option<i64>,
    pub is_active: Option<bool>,
}
