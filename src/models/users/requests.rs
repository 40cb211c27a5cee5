use super::entities::{RoleCode, UserStatus};
use crate::models::common::{PaginationQuery, deserialize_optional_from_str};
use serde::Deserialize;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub role: Option<RoleCode>,
    pub status: Option<UserStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub faculty_id: Option<i64>,
    pub search: Option<String>,
}

// 用户创建请求（管理员）
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    /// 为空时生成随机密码并通过欢迎邮件发送
    pub password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
    pub faculty_id: Option<i64>,
    pub career_id: Option<i64>,
    #[serde(default)]
    pub roles: Vec<RoleCode>,
}

// 用户更新请求
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub document_number: Option<String>,
    pub status: Option<UserStatus>,
    pub faculty_id: Option<i64>,
    pub career_id: Option<i64>,
}

// 存储层创建用户（密码已哈希）
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
    pub faculty_id: Option<i64>,
    pub career_id: Option<i64>,
    pub roles: Vec<RoleCode>,
}

// 用户列表查询参数（用于存储层）
#[derive(Debug, Clone)]
pub struct UserListQuery {
    pub page: i64,
    pub size: i64,
    pub role: Option<RoleCode>,
    pub status: Option<UserStatus>,
    /// 院系范围：匹配 faculty_id 或所属专业的院系
    pub faculty_id: Option<i64>,
    pub search: Option<String>,
}
