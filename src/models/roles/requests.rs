use serde::Deserialize;

use super::entities::RoleCode;

// 设置用户角色
#[derive(Debug, Deserialize)]
pub struct SetUserRolesRequest {
    pub roles: Vec<RoleCode>,
}

// 设置角色权限
#[derive(Debug, Deserialize)]
pub struct SetRolePermissionsRequest {
    pub permissions: Vec<String>,
}
