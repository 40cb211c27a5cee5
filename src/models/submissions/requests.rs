use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::FieldErrors;
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};

#[derive(Debug, Deserialize)]
pub struct SubmissionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub assignment_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub student_id: Option<i64>,
    /// 只看未评分
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub ungraded: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct SubmissionListQuery {
    pub page: i64,
    pub size: i64,
    pub assignment_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub student_id: Option<i64>,
    pub ungraded: Option<bool>,
    /// 可见课程 ID，`None` 表示不限制
    pub visible_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct GroupedSubmissionsParams {
    pub subject_id: Option<i64>,
    pub assignment_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct GradeSubmissionRequest {
    pub grade: Decimal,
    pub feedback: Option<String>,
}

pub fn validate_grade(grade: Decimal) -> Result<(), FieldErrors> {
    if grade < Decimal::ZERO || grade > Decimal::ONE_HUNDRED {
        let mut errors = FieldErrors::new();
        errors.insert("grade".to_string(), "成绩必须在 0-100 之间".to_string());
        return Err(errors);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::dec;

    #[test]
    fn test_grade_bounds() {
        assert!(validate_grade(dec!(0)).is_ok());
        assert!(validate_grade(dec!(100)).is_ok());
        assert!(validate_grade(dec!(100.5)).is_err());
        assert!(validate_grade(dec!(-1)).is_err());
    }
}
