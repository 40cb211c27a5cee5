use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RateLimit};
use crate::models::auth::requests::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest,
    RegisterRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

pub async fn refresh_token(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.refresh_token(&request).await
}

pub async fn register(
    req: HttpRequest,
    user_data: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(user_data.into_inner(), &req).await
}

pub async fn logout(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.logout(&request).await
}

pub async fn me(request: HttpRequest) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.me(&request).await
}

pub async fn change_password(
    req: HttpRequest,
    body: web::Json<ChangePasswordRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.change_password(body.into_inner(), &req).await
}

pub async fn request_password_reset(
    req: HttpRequest,
    body: web::Json<PasswordResetRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.request_password_reset(body.into_inner(), &req).await
}

pub async fn confirm_password_reset(
    req: HttpRequest,
    body: web::Json<PasswordResetConfirmRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.confirm_password_reset(body.into_inner(), &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/auth")
            .service(
                web::resource("/login")
                    .wrap(RateLimit::login())
                    .route(web::post().to(login)),
            )
            .service(
                web::resource("/register")
                    .wrap(RateLimit::register())
                    .route(web::post().to(register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(RateLimit::refresh_token())
                    .route(web::post().to(refresh_token)),
            )
            .service(
                web::scope("/password-reset")
                    .wrap(RateLimit::password_reset())
                    .route("/request", web::post().to(request_password_reset))
                    .route("/confirm", web::post().to(confirm_password_reset)),
            )
            .service(
                web::scope("")
                    .wrap(middlewares::RequireJWT)
                    .route("/logout", web::post().to(logout))
                    .route("/me", web::get().to(me))
                    .route("/password", web::put().to(change_password)),
            ),
    );
}
