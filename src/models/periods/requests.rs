use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::FieldErrors;
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};

#[derive(Debug, Deserialize)]
pub struct PeriodListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PeriodListQuery {
    pub page: i64,
    pub size: i64,
    pub is_active: Option<bool>,
    pub search: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePeriodRequest {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePeriodRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct ClonePeriodRequest {
    pub target_period_id: i64,
}

/// 结束日期必须晚于开始日期
pub fn validate_period_dates(start: NaiveDate, end: NaiveDate) -> Result<(), FieldErrors> {
    if end <= start {
        let mut errors = FieldErrors::new();
        errors.insert(
            "end_date".to_string(),
            "结束日期必须晚于开始日期".to_string(),
        );
        return Err(errors);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_period_dates() {
        assert!(validate_period_dates(d(2025, 2, 1), d(2025, 6, 30)).is_ok());
        let err = validate_period_dates(d(2025, 6, 30), d(2025, 6, 30)).unwrap_err();
        assert!(err.contains_key("end_date"));
        assert!(validate_period_dates(d(2025, 7, 1), d(2025, 6, 30)).is_err());
    }
}
