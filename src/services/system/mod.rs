use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::Result;
use crate::models::system::HealthResponse;
use crate::models::{ApiResponse, AppStartTime, ErrorCode};
use crate::storage::Storage;

pub struct SystemService {
    storage: Option<Arc<dyn Storage>>,
}

impl SystemService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        super::resolve_storage(&self.storage, request)
    }

    /// 健康检查，数据库不可用时返回 503
    pub async fn health(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        let config = AppConfig::get();
        let storage = self.get_storage(request)?;

        let database_ok = match storage.ping().await {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Health check: database unreachable: {}", e);
                false
            }
        };

        let started_at = request
            .app_data::<web::Data<AppStartTime>>()
            .map(|t| t.start_datetime)
            .unwrap_or_else(chrono::Utc::now);
        let response = HealthResponse {
            status: if database_ok { "ok" } else { "degraded" },
            system_name: config.app.system_name.clone(),
            environment: config.app.environment.clone(),
            version: env!("CARGO_PKG_VERSION"),
            database: if database_ok { "up" } else { "down" },
            started_at,
            uptime_seconds: (chrono::Utc::now() - started_at).num_seconds(),
        };

        if database_ok {
            Ok(HttpResponse::Ok().json(ApiResponse::success(response, "服务正常")))
        } else {
            Ok(HttpResponse::ServiceUnavailable().json(ApiResponse::error(
                ErrorCode::InternalServerError,
                response,
                "数据库不可用",
            )))
        }
    }
}
