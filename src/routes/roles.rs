use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::roles::entities::perms;
use crate::models::roles::requests::SetRolePermissionsRequest;
use crate::services::RoleService;
use crate::utils::SafeRoleCode;

static ROLE_SERVICE: Lazy<RoleService> = Lazy::new(RoleService::new_lazy);

pub async fn list_roles(req: HttpRequest) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.list_roles(&req).await
}

pub async fn list_permissions(req: HttpRequest) -> ActixResult<HttpResponse> {
    ROLE_SERVICE.list_permissions(&req).await
}

pub async fn set_role_permissions(
    req: HttpRequest,
    role: SafeRoleCode,
    body: web::Json<SetRolePermissionsRequest>,
) -> ActixResult<HttpResponse> {
    ROLE_SERVICE
        .set_role_permissions(role.0, body.into_inner(), &req)
        .await
}

// 配置路由
pub fn configure_role_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/roles")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_roles))
            .service(
                web::scope("")
                    .wrap(middlewares::RequirePermission::new(perms::ASSIGN_ROLES))
                    .route("/{code}/permissions", web::put().to(set_role_permissions)),
            ),
    )
    .service(
        web::scope("/api/v1/permissions")
            .wrap(middlewares::RequireJWT)
            .route("", web::get().to(list_permissions)),
    );
}
