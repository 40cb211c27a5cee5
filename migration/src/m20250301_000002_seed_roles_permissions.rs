use sea_orm_migration::prelude::*;

use crate::m20250301_000001_create_tables::{Permissions, RolePermissions, Roles};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// 角色目录: (code, name, description)
const ROLES: &[(&str, &str, &str)] = &[
    ("super_admin", "Super administrator", "Unrestricted access"),
    ("admin", "Administrator", "Faculty administration"),
    ("coordinator", "Coordinator", "Academic coordination of a faculty"),
    ("teacher", "Teacher", "Teaches assigned subjects"),
    ("student", "Student", "Enrolled student"),
];

/// 权限目录: (code, name)
const PERMISSIONS: &[(&str, &str)] = &[
    ("create_faculty", "Create faculties"),
    ("edit_faculty", "Edit faculties"),
    ("delete_faculty", "Delete faculties"),
    ("view_faculties", "View faculties"),
    ("create_career", "Create careers"),
    ("edit_career", "Edit careers"),
    ("delete_career", "Delete careers"),
    ("view_careers", "View careers"),
    ("create_subject", "Create subjects"),
    ("edit_subject", "Edit subjects"),
    ("delete_subject", "Delete subjects"),
    ("view_subjects", "View subjects"),
    ("grade_assignment", "Grade assignments"),
    ("view_grades", "View grades"),
    ("edit_grades", "Edit grades"),
    ("create_user", "Create users"),
    ("edit_user", "Edit users"),
    ("delete_user", "Delete users"),
    ("view_users", "View users"),
    ("assign_roles", "Assign roles"),
    ("view_general_reports", "View general reports"),
    ("view_academic_reports", "View academic reports"),
    ("export_reports", "Export reports"),
    ("send_notifications", "Send notifications"),
    ("receive_monthly_report", "Receive the monthly status report"),
];

/// 默认角色权限
fn default_permissions(role: &str) -> Vec<&'static str> {
    match role {
        "super_admin" => PERMISSIONS.iter().map(|(code, _)| *code).collect(),
        "admin" => PERMISSIONS
            .iter()
            .map(|(code, _)| *code)
            .filter(|code| *code != "assign_roles")
            .collect(),
        "coordinator" => vec![
            "view_faculties",
            "create_career",
            "edit_career",
            "delete_career",
            "view_careers",
            "create_subject",
            "edit_subject",
            "delete_subject",
            "view_subjects",
            "grade_assignment",
            "view_grades",
            "edit_grades",
            "view_users",
            "view_academic_reports",
            "export_reports",
            "receive_monthly_report",
        ],
        "teacher" => vec![
            "view_subjects",
            "grade_assignment",
            "view_grades",
            "edit_grades",
        ],
        "student" => vec!["view_subjects", "view_grades"],
        _ => Vec::new(),
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (code, name, description) in ROLES {
            let insert = Query::insert()
                .into_table(Roles::Table)
                .columns([Roles::Code, Roles::Name, Roles::Description])
                .values_panic([(*code).into(), (*name).into(), (*description).into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        for (code, name) in PERMISSIONS {
            let insert = Query::insert()
                .into_table(Permissions::Table)
                .columns([Permissions::Code, Permissions::Name])
                .values_panic([(*code).into(), (*name).into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        // 通过 roles x permissions 交叉查询写入关联，避免依赖自增 ID
        for (role, _, _) in ROLES {
            let granted = default_permissions(role);
            if granted.is_empty() {
                continue;
            }

            let select = Query::select()
                .column((Roles::Table, Roles::Id))
                .column((Permissions::Table, Permissions::Id))
                .from(Roles::Table)
                .from(Permissions::Table)
                .and_where(Expr::col((Roles::Table, Roles::Code)).eq(*role))
                .and_where(Expr::col((Permissions::Table, Permissions::Code)).is_in(granted))
                .to_owned();

            let insert = Query::insert()
                .into_table(RolePermissions::Table)
                .columns([RolePermissions::RoleId, RolePermissions::PermissionId])
                .select_from(select)
                .map_err(|e| DbErr::Custom(format!("构建角色权限插入语句失败: {e}")))?
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .exec_stmt(Query::delete().from_table(RolePermissions::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Permissions::Table).to_owned())
            .await?;
        manager
            .exec_stmt(Query::delete().from_table(Roles::Table).to_owned())
            .await?;
        Ok(())
    }
}
