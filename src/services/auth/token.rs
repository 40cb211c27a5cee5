use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::load_user;
use crate::models::auth::responses::{RefreshTokenResponse, UserInfoResponse};
use crate::models::users::entities::UserStatus;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, object_cache};
use crate::utils::jwt;

use super::AuthService;

fn relogin_required(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(jwt::JwtUtils::expired_refresh_cookie())
        .json(ApiResponse::error_empty(ErrorCode::Unauthorized, message))
}

pub async fn handle_refresh_token(
    service: &AuthService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let config = service.get_config();

    // 从 cookie 中提取 refresh token
    let Some(refresh_token) = jwt::JwtUtils::refresh_token_from_cookie(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized access, please login",
        )));
    };

    let user_id = match jwt::JwtUtils::verify_refresh_token(&refresh_token)
        .ok()
        .and_then(|claims| claims.user_id())
    {
        Some(id) => id,
        None => {
            tracing::info!("Refresh token rejected");
            return Ok(relogin_required(
                "Login expired or invalid, please login again",
            ));
        }
    };

    // 重新加载用户，角色变化会反映在新 token 中
    let storage = service.get_storage(request)?;
    let cache = object_cache(request);
    let user = match load_user(user_id, &storage, cache.as_ref()).await {
        Ok(Some(user)) if user.status == UserStatus::Active => user,
        Ok(_) => return Ok(relogin_required("Account is not available")),
        Err(e) => {
            tracing::error!("Refresh token failed: {}", e);
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to refresh token",
                )),
            );
        }
    };

    match user.generate_access_token() {
        Ok(access_token) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            RefreshTokenResponse {
                access_token,
                expires_in: config.jwt.access_token_expiry * 60,
            },
            "Token refreshed successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate access token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Failed to refresh token",
                )),
            )
        }
    }
}

/// 清除 refresh token cookie
pub async fn handle_logout(request: &HttpRequest) -> ActixResult<HttpResponse> {
    if let Ok(user) = current_user(request) {
        tracing::info!("User {} logged out", user.username);
    }
    Ok(HttpResponse::Ok()
        .cookie(jwt::JwtUtils::expired_refresh_cookie())
        .json(ApiResponse::success_empty("登出成功")))
}

pub async fn handle_me(request: &HttpRequest) -> ActixResult<HttpResponse> {
    let user = current_user(request)?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        UserInfoResponse { user },
        "User information retrieved successfully",
    )))
}
