use serde::Serialize;

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub system_name: String,
    pub environment: String,
    pub version: &'static str,
    pub database: &'static str,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub uptime_seconds: i64,
}
