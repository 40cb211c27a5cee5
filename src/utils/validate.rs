//! 账号字段校验

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::FieldErrors;

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").expect("Invalid username regex"));

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static DOCUMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9-]{5,20}$").expect("Invalid document regex"));

/// 常见弱密码（不区分大小写比较）
const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password1",
    "password123",
    "12345678",
    "123456789",
    "1234567890",
    "qwerty123",
    "qwertyuiop",
    "admin123",
    "abcd1234",
    "welcome1",
    "letmein1",
    "iloveyou1",
    "contrasena1",
    "universidad1",
];

pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let len = username.chars().count();
    if !(4..=30).contains(&len) {
        return Err("用户名长度必须在 4-30 之间");
    }
    if !USERNAME_RE.is_match(username) {
        return Err("用户名只能包含字母、数字、点、下划线或连字符");
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if !EMAIL_RE.is_match(email) {
        return Err("邮箱格式无效");
    }
    Ok(())
}

pub fn validate_document(document: &str) -> Result<(), &'static str> {
    if !DOCUMENT_RE.is_match(document) {
        return Err("证件号必须为 5-20 位字母、数字或连字符");
    }
    Ok(())
}

/// 密码策略：至少 8 位，包含大写、小写和数字，且不是常见密码
pub fn password_policy_errors(password: &str) -> Vec<&'static str> {
    let mut errors = Vec::new();

    if password.chars().count() < 8 {
        errors.push("密码至少需要 8 个字符");
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("密码必须包含大写字母");
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        errors.push("密码必须包含小写字母");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("密码必须包含数字");
    }
    if COMMON_PASSWORDS
        .iter()
        .any(|weak| password.eq_ignore_ascii_case(weak))
    {
        errors.push("密码过于常见，请选择更安全的密码");
    }

    errors
}

pub fn validate_password(password: &str) -> Result<(), String> {
    let errors = password_policy_errors(password);
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

/// 注册和创建用户时的字段校验，收集全部错误
pub fn validate_account_fields(
    username: &str,
    email: &str,
    password: &str,
    document_number: Option<&str>,
) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    if let Err(msg) = validate_username(username) {
        errors.insert("username".to_string(), msg.to_string());
    }
    if let Err(msg) = validate_email(email) {
        errors.insert("email".to_string(), msg.to_string());
    }
    if let Err(msg) = validate_password(password) {
        errors.insert("password".to_string(), msg);
    }
    if let Some(document) = document_number
        && !document.is_empty()
        && let Err(msg) = validate_document(document)
    {
        errors.insert("document_number".to_string(), msg.to_string());
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_password() {
        assert!(validate_password("SecureP@ss1").is_ok());
        assert!(validate_password("Matematica2025").is_ok());
    }

    #[test]
    fn test_password_policy_reports_each_rule() {
        assert!(password_policy_errors("Ab1").contains(&"密码至少需要 8 个字符"));
        assert!(password_policy_errors("abcd12345").contains(&"密码必须包含大写字母"));
        assert!(password_policy_errors("ABCD12345").contains(&"密码必须包含小写字母"));
        assert!(password_policy_errors("AbcdEfgh").contains(&"密码必须包含数字"));
    }

    #[test]
    fn test_common_password_is_rejected() {
        let errors = password_policy_errors("Password123");
        assert_eq!(errors, vec!["密码过于常见，请选择更安全的密码"]);
    }

    #[test]
    fn test_username_rules() {
        assert!(validate_username("ana.perez").is_ok());
        assert!(validate_username("abc").is_err());
        assert!(validate_username("ana perez").is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("ana@uni.edu.bo").is_ok());
        assert!(validate_email("ana@uni").is_err());
    }

    #[test]
    fn test_account_fields_collects_all_errors() {
        let errors = validate_account_fields("ab", "bad", "short", Some("1")).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(validate_account_fields("ana.perez", "ana@uni.edu", "Secreto2025", None).is_ok());
    }
}
