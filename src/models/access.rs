//! 基于角色的数据可见范围
//!
//! 每个请求只解析一次调用者的角色，得到一个 [`AccessScope`]，
//! 存储层据此把列表和详情查询限定到可见的课程集合。

use serde::Serialize;

use crate::models::roles::entities::RoleCode;
use crate::models::users::entities::User;

/// 调用者的数据可见范围，多个角色时取最宽的一个
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum AccessScope {
    /// 不受限制
    Everything,
    /// 限定在某个院系；`None` 表示未分配院系，看不到任何数据
    Faculty(Option<i64>),
    /// 通过任课关系可见
    Teaching(i64),
    /// 通过选课关系可见
    Enrolled(i64),
}

impl AccessScope {
    pub fn for_user(user: &User) -> Self {
        if user.has_role(RoleCode::SuperAdmin) {
            return AccessScope::Everything;
        }
        if user.has_role(RoleCode::Admin) {
            return match user.faculty_id {
                Some(faculty_id) => AccessScope::Faculty(Some(faculty_id)),
                None => AccessScope::Everything,
            };
        }
        if user.has_role(RoleCode::Coordinator) {
            return AccessScope::Faculty(user.faculty_id);
        }
        if user.has_role(RoleCode::Teacher) {
            return AccessScope::Teaching(user.id);
        }
        AccessScope::Enrolled(user.id)
    }

    pub fn is_everything(&self) -> bool {
        matches!(self, AccessScope::Everything)
    }

    /// 教职工范围（可以管理作业、查看他人成绩）
    pub fn is_staff(&self) -> bool {
        !matches!(self, AccessScope::Enrolled(_))
    }

    /// 范围内的学生只能看到自己的数据
    pub fn own_student_id(&self) -> Option<i64> {
        match self {
            AccessScope::Enrolled(id) => Some(*id),
            _ => None,
        }
    }

    /// 院系级写操作：院系是否在范围内
    pub fn covers_faculty(&self, faculty_id: i64) -> bool {
        match self {
            AccessScope::Everything => true,
            AccessScope::Faculty(Some(own)) => *own == faculty_id,
            _ => false,
        }
    }

    /// 专业列表的院系过滤条件。`Some(None)` 表示结果必然为空
    pub fn career_faculty_filter(&self) -> Option<Option<i64>> {
        match self {
            AccessScope::Faculty(faculty) => Some(*faculty),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::fixtures::user;

    #[test]
    fn test_super_admin_sees_everything() {
        let u = user(1, &[RoleCode::SuperAdmin, RoleCode::Teacher]);
        assert_eq!(AccessScope::for_user(&u), AccessScope::Everything);
    }

    #[test]
    fn test_admin_scope_depends_on_faculty() {
        let mut u = user(2, &[RoleCode::Admin]);
        assert_eq!(AccessScope::for_user(&u), AccessScope::Everything);
        u.faculty_id = Some(9);
        assert_eq!(AccessScope::for_user(&u), AccessScope::Faculty(Some(9)));
    }

    #[test]
    fn test_coordinator_without_faculty_is_empty() {
        let u = user(3, &[RoleCode::Coordinator]);
        let scope = AccessScope::for_user(&u);
        assert_eq!(scope, AccessScope::Faculty(None));
        assert!(!scope.covers_faculty(1));
        assert_eq!(scope.career_faculty_filter(), Some(None));
    }

    #[test]
    fn test_broadest_role_wins() {
        let mut u = user(4, &[RoleCode::Student, RoleCode::Teacher, RoleCode::Coordinator]);
        u.faculty_id = Some(2);
        assert_eq!(AccessScope::for_user(&u), AccessScope::Faculty(Some(2)));

        let u = user(5, &[RoleCode::Student, RoleCode::Teacher]);
        assert_eq!(AccessScope::for_user(&u), AccessScope::Teaching(5));
    }

    #[test]
    fn test_student_scope() {
        let u = user(6, &[RoleCode::Student]);
        let scope = AccessScope::for_user(&u);
        assert_eq!(scope, AccessScope::Enrolled(6));
        assert!(!scope.is_staff());
        assert_eq!(scope.own_student_id(), Some(6));
    }

    #[test]
    fn test_user_without_roles_gets_narrowest_scope() {
        let u = user(7, &[]);
        assert_eq!(AccessScope::for_user(&u), AccessScope::Enrolled(7));
    }
}
