use serde::Deserialize;

use crate::models::FieldErrors;
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};

#[derive(Debug, Deserialize)]
pub struct SubjectListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub period_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub career_id: Option<i64>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct SubjectListQuery {
    pub page: i64,
    pub size: i64,
    pub period_id: Option<i64>,
    pub career_id: Option<i64>,
    pub search: Option<String>,
    pub is_active: Option<bool>,
    /// 可见课程 ID，`None` 表示不限制
    pub visible_ids: Option<Vec<i64>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub credits: i32,
    /// 默认为当前学期
    pub period_id: Option<i64>,
    /// 创建时同时加入的专业培养方案
    #[serde(default)]
    pub careers: Vec<PlanEntryInput>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub credits: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlanEntryInput {
    pub career_id: i64,
    pub semester: i32,
    #[serde(default = "default_mandatory")]
    pub is_mandatory: bool,
    pub credits_override: Option<i32>,
}

fn default_mandatory() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct SetSubjectCareersRequest {
    pub careers: Vec<PlanEntryInput>,
}

#[derive(Debug, Deserialize)]
pub struct SetPrerequisitesRequest {
    pub prerequisite_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct AssignTeacherRequest {
    pub teacher_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SubjectImportParams {
    pub period_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TemplateParams {
    pub format: Option<String>,
}

/// 课程基础字段校验
pub fn validate_subject_fields(
    name: Option<&str>,
    code: Option<&str>,
    credits: Option<i32>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if name.is_some_and(|n| n.trim().is_empty()) {
        errors.insert("name".to_string(), "课程名称不能为空".to_string());
    }
    if let Some(code) = code {
        let code = code.trim();
        if code.is_empty() || code.len() > 20 {
            errors.insert("code".to_string(), "课程代码长度必须在 1-20 之间".to_string());
        } else if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            errors.insert(
                "code".to_string(),
                "课程代码只能包含字母、数字、连字符和下划线".to_string(),
            );
        }
    }
    if credits.is_some_and(|c| !(1..=30).contains(&c)) {
        errors.insert("credits".to_string(), "学分必须在 1-30 之间".to_string());
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// 培养方案条目校验
pub fn validate_plan_entries(entries: &[PlanEntryInput]) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut seen = std::collections::HashSet::new();
    for (idx, entry) in entries.iter().enumerate() {
        if !(1..=12).contains(&entry.semester) {
            errors.insert(
                format!("careers[{idx}].semester"),
                "学期序号必须在 1-12 之间".to_string(),
            );
        }
        if entry
            .credits_override
            .is_some_and(|c| !(1..=30).contains(&c))
        {
            errors.insert(
                format!("careers[{idx}].credits_override"),
                "学分必须在 1-30 之间".to_string(),
            );
        }
        if !seen.insert(entry.career_id) {
            errors.insert(
                format!("careers[{idx}].career_id"),
                "同一专业不能重复".to_string(),
            );
        }
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

    #[test]
    fn test_subject_fields() {
        assert!(validate_subject_fields(Some("Álgebra"), Some("ALG101"), Some(4)).is_ok());
        let err = validate_subject_fields(Some(" "), Some("ALG 101"), Some(0)).unwrap_err();
        assert_eq!(err.len(), 3);
        // 未提供的字段不校验
        assert!(validate_subject_fields(None, None, None).is_ok());
    }

    #[test]
    fn test_plan_entries() {
        let entry = |career_id, semester| PlanEntryInput {
            career_id,
            semester,
            is_mandatory: true,
            credits_override: None,
        };
        assert!(validate_plan_entries(&[entry(1, 1), entry(2, 12)]).is_ok());
        let err = validate_plan_entries(&[entry(1, 13), entry(1, 2)]).unwrap_err();
        assert!(err.contains_key("careers[0].semester"));
        assert!(err.contains_key("careers[1].career_id"));
    }
}
