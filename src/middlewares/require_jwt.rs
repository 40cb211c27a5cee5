/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access_token>`，加载当前用户并放入请求扩展。
 * 同时把用户角色解析为 [`AccessScope`]，后续处理程序无需再次判断角色。
 *
 * ## 使用方法
 *
 * ```rust,ignore
 * use actix_web::web;
 * use crate::middlewares::RequireJWT;
 *
 * web::scope("/api/v1/subjects")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_subjects));
 *
 * async fn list_subjects(req: HttpRequest) -> ActixResult<HttpResponse> {
 *     let user = RequireJWT::extract_user(&req);
 *     let scope = RequireJWT::extract_scope(&req);
 *     // ...
 * }
 * ```
 *
 * ## 认证流程
 *
 * 1. 校验签名、过期时间和 token 类型（必须是 access token）
 * 2. 按用户 ID 从缓存读取用户，未命中时查询数据库并写回缓存
 * 3. 非活跃用户一律拒绝
 */

use crate::cache::{CacheResult, ObjectCache, user_cache_key};
use crate::config::AppConfig;
use crate::models::access::AccessScope;
use crate::models::users::entities::{User, UserStatus};
use crate::models::ErrorCode;
use crate::storage::Storage;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info, warn};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 按用户 ID 加载用户，优先读缓存
pub async fn load_user(
    user_id: i64,
    storage: &Arc<dyn Storage>,
    cache: Option<&Arc<dyn ObjectCache>>,
) -> Result<Option<User>, String> {
    let key = user_cache_key(user_id);

    if let Some(cache) = cache {
        match cache.get_raw(&key).await {
            CacheResult::Found(json) => match serde_json::from_str::<User>(&json) {
                Ok(user) => return Ok(Some(user)),
                Err(_) => {
                    cache.remove(&key).await;
                    info!("Failed to deserialize cached user {}", user_id);
                }
            },
            _ => debug!("User {} not found in cache", user_id),
        }
    }

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| format!("Failed to retrieve user from storage: {e}"))?;

    if let (Some(cache), Some(user)) = (cache, user.as_ref())
        && let Ok(json) = serde_json::to_string(user)
    {
        cache
            .insert_raw(key, json, AppConfig::get().cache.default_ttl)
            .await;
    }

    Ok(user)
}

// 提取并验证 JWT access token
async fn extract_and_validate_jwt(req: &ServiceRequest) -> Result<User, String> {
    let token = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| "Missing or invalid Authorization header".to_string())?;

    let claims = crate::utils::jwt::JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid JWT token".to_string()
    })?;

    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in JWT".to_string())?;

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .ok_or_else(|| "Storage not configured".to_string())?
        .get_ref()
        .clone();
    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|c| c.get_ref().clone());

    let user = load_user(user_id, &storage, cache.as_ref())
        .await?
        .ok_or_else(|| "User not found".to_string())?;

    if user.status != UserStatus::Active {
        return Err("User is not active".to_string());
    }

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(
                    create_error_response(StatusCode::NO_CONTENT, ErrorCode::Success, "")
                        .map_into_right_body(),
                ));
            }

            match extract_and_validate_jwt(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    let scope = AccessScope::for_user(&user);
                    req.extensions_mut().insert(scope);
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(err) => {
                    warn!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            &format!("Unauthorized: {err}"),
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

// 从请求中提取用户信息
impl RequireJWT {
    /// 当前用户，只能在 RequireJWT 保护的路由中使用
    pub fn extract_user(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    /// 当前用户的数据可见范围
    pub fn extract_scope(req: &actix_web::HttpRequest) -> Option<AccessScope> {
        req.extensions().get::<AccessScope>().copied()
    }
}
