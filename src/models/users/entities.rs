use serde::{Deserialize, Serialize};

pub use crate::models::roles::entities::RoleCode;

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
//
// 角色只来自 user_roles 关联表；permissions 为所有角色权限的并集。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub document_number: Option<String>,
    pub status: UserStatus,
    pub faculty_id: Option<i64>,
    pub career_id: Option<i64>,
    pub roles: Vec<RoleCode>,
    pub permissions: Vec<String>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn has_role(&self, role: RoleCode) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[RoleCode]) -> bool {
        roles.iter().any(|r| self.roles.contains(r))
    }

    pub fn is_super_admin(&self) -> bool {
        self.has_role(RoleCode::SuperAdmin)
    }

    /// 超级管理员隐式拥有全部权限
    pub fn has_permission(&self, code: &str) -> bool {
        self.is_super_admin() || self.permissions.iter().any(|p| p == code)
    }

    /// 等级最高的角色，用于 JWT 和展示
    pub fn primary_role(&self) -> Option<RoleCode> {
        self.roles.iter().copied().max_by_key(|r| r.rank())
    }

    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.username.clone()
        } else {
            name.to_string()
        }
    }

    fn role_claim(&self) -> String {
        self.primary_role()
            .map(|r| r.to_string())
            .unwrap_or_default()
    }

    // 生成 token 对（access + refresh）
    pub fn generate_token_pair(&self) -> Result<crate::utils::jwt::TokenPair, String> {
        crate::utils::jwt::JwtUtils::generate_token_pair(self.id, &self.role_claim())
            .map_err(|e| format!("生成 token 对失败: {e}"))
    }

    // 仅生成 access token（刷新时使用）
    pub fn generate_access_token(&self) -> Result<String, String> {
        crate::utils::jwt::JwtUtils::generate_access_token(self.id, &self.role_claim())
            .map_err(|e| format!("生成 access token 失败: {e}"))
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// 测试用用户
    pub fn user(id: i64, roles: &[RoleCode]) -> User {
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            first_name: "Test".to_string(),
            last_name: format!("User{id}"),
            document_number: None,
            status: UserStatus::Active,
            faculty_id: None,
            career_id: None,
            roles: roles.to_vec(),
            permissions: Vec::new(),
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::user;
    use super::*;

    #[test]
    fn test_primary_role_picks_highest_rank() {
        let u = user(1, &[RoleCode::Student, RoleCode::Coordinator, RoleCode::Teacher]);
        assert_eq!(u.primary_role(), Some(RoleCode::Coordinator));
        assert_eq!(user(2, &[]).primary_role(), None);
    }

    #[test]
    fn test_super_admin_has_every_permission() {
        let admin = user(1, &[RoleCode::SuperAdmin]);
        assert!(admin.has_permission("assign_roles"));

        let mut teacher = user(2, &[RoleCode::Teacher]);
        assert!(!teacher.has_permission("grade_assignment"));
        teacher.permissions.push("grade_assignment".to_string());
        assert!(teacher.has_permission("grade_assignment"));
    }

    #[test]
    fn test_full_name_falls_back_to_username() {
        let mut u = user(7, &[RoleCode::Student]);
        assert_eq!(u.full_name(), "Test User7");
        u.first_name = " ".to_string();
        u.last_name = String::new();
        assert_eq!(u.full_name(), "user7");
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let mut u = user(3, &[RoleCode::Teacher]);
        u.password_hash = "secret-hash".to_string();
        let json = serde_json::to_string(&u).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
