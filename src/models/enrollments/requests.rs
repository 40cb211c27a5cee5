use serde::Deserialize;

use super::entities::EnrollmentStatus;
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};

#[derive(Debug, Deserialize)]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub period_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
}

#[derive(Debug, Clone)]
pub struct EnrollmentListQuery {
    pub page: i64,
    pub size: i64,
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
    pub period_id: Option<i64>,
    pub status: Option<EnrollmentStatus>,
    /// 可见课程 ID，`None` 表示不限制
    pub visible_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub subject_id: i64,
    /// 教职工代学生选课时指定
    pub student_id: Option<i64>,
    /// 默认为当前学期
    pub period_id: Option<i64>,
    #[serde(default)]
    pub schedule: String,
}

#[derive(Debug, Deserialize)]
pub struct AvailableSubjectsParams {
    /// 教职工查看指定学生可选课程
    pub student_id: Option<i64>,
}
