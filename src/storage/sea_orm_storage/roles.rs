//! 角色与权限存储操作

use std::collections::HashMap;

use super::{SeaOrmStorage, read_err, write_err};
use crate::entity::permissions::{Column as PermissionColumn, Entity as Permissions};
use crate::entity::role_permissions::{
    ActiveModel as RolePermissionActiveModel, Column as RolePermissionColumn,
    Entity as RolePermissions,
};
use crate::entity::roles::{Column, Entity as Roles};
use crate::errors::{AcademiaError, Result};
use crate::models::roles::entities::{Permission, Role, RoleCode};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

impl SeaOrmStorage {
    /// 列出所有角色（含权限代码）
    pub async fn list_roles_impl(&self) -> Result<Vec<Role>> {
        let roles = Roles::find()
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(read_err("查询角色失败"))?;

        let grants = RolePermissions::find()
            .find_also_related(Permissions)
            .all(&self.db)
            .await
            .map_err(read_err("查询角色权限失败"))?;

        let mut perms: HashMap<i64, Vec<String>> = HashMap::new();
        for (grant, permission) in grants {
            if let Some(permission) = permission {
                perms.entry(grant.role_id).or_default().push(permission.code);
            }
        }

        Ok(roles
            .into_iter()
            .filter_map(|r| {
                let mut codes = perms.remove(&r.id).unwrap_or_default();
                codes.sort();
                r.into_role(codes)
            })
            .collect())
    }

    pub async fn list_permissions_impl(&self) -> Result<Vec<Permission>> {
        let permissions = Permissions::find()
            .order_by_asc(PermissionColumn::Code)
            .all(&self.db)
            .await
            .map_err(read_err("查询权限失败"))?;

        Ok(permissions.into_iter().map(|p| p.into_permission()).collect())
    }

    /// 替换角色的权限集合
    pub async fn set_role_permissions_impl(
        &self,
        role: RoleCode,
        permissions: &[String],
    ) -> Result<Option<Role>> {
        let Some(role_model) = Roles::find()
            .filter(Column::Code.eq(role.as_str()))
            .one(&self.db)
            .await
            .map_err(read_err("查询角色失败"))?
        else {
            return Ok(None);
        };

        let permission_models = Permissions::find()
            .filter(PermissionColumn::Code.is_in(permissions.to_vec()))
            .all(&self.db)
            .await
            .map_err(read_err("查询权限失败"))?;

        if permission_models.len() != permissions.len() {
            let known: Vec<&str> = permission_models.iter().map(|p| p.code.as_str()).collect();
            let unknown: Vec<&str> = permissions
                .iter()
                .map(String::as_str)
                .filter(|p| !known.contains(p))
                .collect();
            return Err(AcademiaError::validation(format!(
                "未知的权限代码: {}",
                unknown.join(", ")
            )));
        }

        let txn = self.db.begin().await.map_err(read_err("开启事务失败"))?;

        RolePermissions::delete_many()
            .filter(RolePermissionColumn::RoleId.eq(role_model.id))
            .exec(&txn)
            .await
            .map_err(write_err("清除角色权限失败"))?;

        for permission in &permission_models {
            RolePermissionActiveModel {
                role_id: Set(role_model.id),
                permission_id: Set(permission.id),
                ..Default::default()
            }
            .insert(&txn)
            .await
            .map_err(write_err("写入角色权限失败"))?;
        }

        txn.commit().await.map_err(write_err("提交事务失败"))?;

        let mut codes: Vec<String> = permission_models.into_iter().map(|p| p.code).collect();
        codes.sort();
        Ok(role_model.into_role(codes))
    }
}
