use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::entities::{AssignmentKind, AssignmentStatus};
use super::weights::is_valid_weight;
use crate::models::FieldErrors;
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};

#[derive(Debug, Deserialize)]
pub struct AssignmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub subject_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub kind: Option<AssignmentKind>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssignmentListQuery {
    pub page: i64,
    pub size: i64,
    pub subject_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    pub kind: Option<AssignmentKind>,
    pub search: Option<String>,
    /// 可见课程 ID，`None` 表示不限制
    pub visible_ids: Option<Vec<i64>>,
    /// 学生只能看到已发布/已关闭的作业
    pub hide_drafts: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub subject_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentKind,
    pub weight: Decimal,
    pub publish_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    #[serde(default)]
    pub allow_late_submission: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<AssignmentKind>,
    pub weight: Option<Decimal>,
    pub publish_at: Option<DateTime<Utc>>,
    pub due_at: Option<DateTime<Utc>>,
    pub allow_late_submission: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct WeightsParams {
    pub subject_id: i64,
}

// 学生提交作业
#[derive(Debug, Deserialize)]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    pub attachment_url: Option<String>,
}

/// 作业字段校验（创建和更新合并后的最终值）
pub fn validate_assignment_fields(
    title: &str,
    weight: Decimal,
    publish_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if title.trim().chars().count() < 5 {
        errors.insert("title".to_string(), "标题至少需要 5 个字符".to_string());
    }
    if !is_valid_weight(weight) {
        errors.insert("weight".to_string(), "权重必须大于 0 且不超过 100".to_string());
    }
    if due_at <= publish_at {
        errors.insert("due_at".to_string(), "截止时间必须晚于发布时间".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal::dec;

    #[test]
    fn test_valid_assignment() {
        let now = Utc::now();
        assert!(
            validate_assignment_fields("Parcial 1", dec!(40), now, now + Duration::days(7)).is_ok()
        );
    }

    #[test]
    fn test_invalid_assignment_collects_all_fields() {
        let now = Utc::now();
        let err = validate_assignment_fields("  abc ", dec!(0), now, now).unwrap_err();
        assert!(err.contains_key("title"));
        assert!(err.contains_key("weight"));
        assert!(err.contains_key("due_at"));
    }
}
