use serde::{Deserialize, Serialize};

// 角色代码
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RoleCode {
    SuperAdmin,  // 超级管理员
    Admin,       // 管理员（院系）
    Coordinator, // 协调员（院系）
    Teacher,     // 教师
    Student,     // 学生
}

impl RoleCode {
    pub const SUPER_ADMIN: &'static str = "super_admin";
    pub const ADMIN: &'static str = "admin";
    pub const COORDINATOR: &'static str = "coordinator";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCode::SuperAdmin => Self::SUPER_ADMIN,
            RoleCode::Admin => Self::ADMIN,
            RoleCode::Coordinator => Self::COORDINATOR,
            RoleCode::Teacher => Self::TEACHER,
            RoleCode::Student => Self::STUDENT,
        }
    }

    /// 权限等级，数值越大范围越广
    pub fn rank(&self) -> u8 {
        match self {
            RoleCode::SuperAdmin => 4,
            RoleCode::Admin => 3,
            RoleCode::Coordinator => 2,
            RoleCode::Teacher => 1,
            RoleCode::Student => 0,
        }
    }

    pub fn all() -> &'static [RoleCode] {
        &[
            RoleCode::SuperAdmin,
            RoleCode::Admin,
            RoleCode::Coordinator,
            RoleCode::Teacher,
            RoleCode::Student,
        ]
    }

    pub fn super_roles() -> &'static [RoleCode] {
        &[RoleCode::SuperAdmin]
    }
    pub fn admin_roles() -> &'static [RoleCode] {
        &[RoleCode::SuperAdmin, RoleCode::Admin]
    }
    /// 教职工（非学生）
    pub fn staff_roles() -> &'static [RoleCode] {
        &[
            RoleCode::SuperAdmin,
            RoleCode::Admin,
            RoleCode::Coordinator,
            RoleCode::Teacher,
        ]
    }
    pub fn student_roles() -> &'static [RoleCode] {
        &[RoleCode::Student]
    }

    /// 管理员只能管理学生和教师账号
    pub fn is_managed_by_admin(&self) -> bool {
        matches!(self, RoleCode::Teacher | RoleCode::Student)
    }
}

impl<'de> Deserialize<'de> for RoleCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的角色: '{s}'. 支持的角色: super_admin, admin, coordinator, teacher, student"
            ))
        })
    }
}

impl std::fmt::Display for RoleCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RoleCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SUPER_ADMIN => Ok(RoleCode::SuperAdmin),
            Self::ADMIN => Ok(RoleCode::Admin),
            Self::COORDINATOR => Ok(RoleCode::Coordinator),
            Self::TEACHER => Ok(RoleCode::Teacher),
            Self::STUDENT => Ok(RoleCode::Student),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

/// 权限代码，与迁移中的种子数据保持一致
pub mod perms {
    pub const CREATE_FACULTY: &str = "create_faculty";
    pub const EDIT_FACULTY: &str = "edit_faculty";
    pub const DELETE_FACULTY: &str = "delete_faculty";
    pub const VIEW_FACULTIES: &str = "view_faculties";
    pub const CREATE_CAREER: &str = "create_career";
    pub const EDIT_CAREER: &str = "edit_career";
    pub const DELETE_CAREER: &str = "delete_career";
    pub const VIEW_CAREERS: &str = "view_careers";
    pub const CREATE_SUBJECT: &str = "create_subject";
    pub const EDIT_SUBJECT: &str = "edit_subject";
    pub const DELETE_SUBJECT: &str = "delete_subject";
    pub const VIEW_SUBJECTS: &str = "view_subjects";
    pub const GRADE_ASSIGNMENT: &str = "grade_assignment";
    pub const VIEW_GRADES: &str = "view_grades";
    pub const EDIT_GRADES: &str = "edit_grades";
    pub const CREATE_USER: &str = "create_user";
    pub const EDIT_USER: &str = "edit_user";
    pub const DELETE_USER: &str = "delete_user";
    pub const VIEW_USERS: &str = "view_users";
    pub const ASSIGN_ROLES: &str = "assign_roles";
    pub const VIEW_GENERAL_REPORTS: &str = "view_general_reports";
    pub const VIEW_ACADEMIC_REPORTS: &str = "view_academic_reports";
    pub const EXPORT_REPORTS: &str = "export_reports";
    pub const SEND_NOTIFICATIONS: &str = "send_notifications";
    pub const RECEIVE_MONTHLY_REPORT: &str = "receive_monthly_report";
}

// 角色实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub code: RoleCode,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
}

// 权限实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_strings() {
        for role in RoleCode::all() {
            assert_eq!(role.as_str().parse::<RoleCode>(), Ok(*role));
        }
        assert!("dean".parse::<RoleCode>().is_err());
    }

    #[test]
    fn test_role_rank_order() {
        assert!(RoleCode::SuperAdmin.rank() > RoleCode::Admin.rank());
        assert!(RoleCode::Admin.rank() > RoleCode::Coordinator.rank());
        assert!(RoleCode::Coordinator.rank() > RoleCode::Teacher.rank());
        assert!(RoleCode::Teacher.rank() > RoleCode::Student.rank());
    }

    #[test]
    fn test_role_deserialize_error_message() {
        let err = serde_json::from_str::<RoleCode>("\"dean\"").unwrap_err();
        assert!(err.to_string().contains("无效的角色"));
        let ok: RoleCode = serde_json::from_str("\"coordinator\"").unwrap();
        assert_eq!(ok, RoleCode::Coordinator);
    }
}
