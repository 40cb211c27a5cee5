/*!
 * 基于权限代码的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。权限是用户所有角色权限的并集，
 * 超级管理员隐式拥有全部权限。
 *
 * ```rust,ignore
 * web::scope("/roles")
 *     .wrap(RequirePermission::new(perms::ASSIGN_ROLES))
 *     .wrap(RequireJWT)
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use crate::models::{ErrorCode, users::entities::User};

use super::create_error_response;

#[derive(Clone)]
pub struct RequirePermission {
    permissions: Vec<&'static str>,
}

impl RequirePermission {
    pub fn new(permission: &'static str) -> Self {
        Self {
            permissions: vec![permission],
        }
    }

    /// 任一权限即可
    pub fn new_any(permissions: &[&'static str]) -> Self {
        Self {
            permissions: permissions.to_vec(),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            permissions: self.permissions.clone(),
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    permissions: Vec<&'static str>,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let permissions = self.permissions.clone();

        Box::pin(async move {
            let allowed = req
                .extensions()
                .get::<User>()
                .map(|user| (user.id, permissions.iter().any(|p| user.has_permission(p))));

            match allowed {
                Some((_, true)) => {
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Some((user_id, false)) => {
                    info!(
                        "Permission denied for user {}. Required any of: {:?}",
                        user_id, permissions
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "没有执行该操作的权限",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                )),
            }
        })
    }
}
