pub mod login;
pub mod password;
pub mod register;
pub mod token;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::auth::requests::{
    ChangePasswordRequest, LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest,
    RegisterRequest,
};
use crate::storage::Storage;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 学生自助注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, request).await
    }

    pub async fn logout(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_logout(request).await
    }

    // 当前用户信息
    pub async fn me(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        token::handle_me(request).await
    }

    pub async fn change_password(
        &self,
        change_request: ChangePasswordRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_change_password(self, change_request, request).await
    }

    pub async fn request_password_reset(
        &self,
        reset_request: PasswordResetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_reset_request(self, reset_request, request).await
    }

    pub async fn confirm_password_reset(
        &self,
        confirm_request: PasswordResetConfirmRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password::handle_reset_confirm(self, confirm_request, request).await
    }
}
