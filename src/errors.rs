//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_academia_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum AcademiaError {
            $($variant(String),)*
        }

        impl AcademiaError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AcademiaError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AcademiaError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AcademiaError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AcademiaError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AcademiaError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_academia_errors! {
    CacheConnection("E001", "Cache Connection Error"),
    CachePluginNotFound("E002", "Cache Plugin Not Found"),
    DatabaseConfig("E003", "Database Configuration Error"),
    DatabaseConnection("E004", "Database Connection Error"),
    DatabaseOperation("E005", "Database Operation Error"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Serialization("E009", "Serialization Error"),
    Conflict("E010", "Resource Conflict"),
    DateParse("E011", "Date Parse Error"),
    Authentication("E012", "Authentication Error"),
    Authorization("E013", "Authorization Error"),
    Mail("E014", "Mail Delivery Error"),
    DocumentRender("E015", "Document Render Error"),
    TaskQueue("E016", "Task Queue Error"),
}

impl AcademiaError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 API 错误码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            AcademiaError::Validation(_) | AcademiaError::DateParse(_) => {
                ErrorCode::ValidationFailed
            }
            AcademiaError::NotFound(_) => ErrorCode::NotFound,
            AcademiaError::Conflict(_) => ErrorCode::Conflict,
            AcademiaError::Authentication(_) => ErrorCode::Unauthorized,
            AcademiaError::Authorization(_) => ErrorCode::Forbidden,
            _ => ErrorCode::InternalServerError,
        }
    }
}

impl fmt::Display for AcademiaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AcademiaError {}

// 服务层可直接使用 `?`，由此处决定 HTTP 状态码
impl ResponseError for AcademiaError {
    fn status_code(&self) -> StatusCode {
        match self {
            AcademiaError::Validation(_) | AcademiaError::DateParse(_) => StatusCode::BAD_REQUEST,
            AcademiaError::NotFound(_) => StatusCode::NOT_FOUND,
            AcademiaError::Conflict(_) => StatusCode::CONFLICT,
            AcademiaError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AcademiaError::Authorization(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self.format_simple());
        }
        HttpResponse::build(status).json(ApiResponse::error_empty(self.api_code(), self.message()))
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for AcademiaError {
    fn from(err: sea_orm::DbErr) -> Self {
        AcademiaError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for AcademiaError {
    fn from(err: std::io::Error) -> Self {
        AcademiaError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for AcademiaError {
    fn from(err: serde_json::Error) -> Self {
        AcademiaError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AcademiaError {
    fn from(err: chrono::ParseError) -> Self {
        AcademiaError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for AcademiaError {
    fn from(err: csv::Error) -> Self {
        AcademiaError::DocumentRender(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for AcademiaError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AcademiaError::DocumentRender(err.to_string())
    }
}

impl From<lettre::error::Error> for AcademiaError {
    fn from(err: lettre::error::Error) -> Self {
        AcademiaError::Mail(err.to_string())
    }
}

impl From<lettre::address::AddressError> for AcademiaError {
    fn from(err: lettre::address::AddressError) -> Self {
        AcademiaError::Mail(err.to_string())
    }
}

impl From<lettre::transport::smtp::Error> for AcademiaError {
    fn from(err: lettre::transport::smtp::Error) -> Self {
        AcademiaError::Mail(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AcademiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AcademiaError::cache_connection("test").code(), "E001");
        assert_eq!(AcademiaError::database_config("test").code(), "E003");
        assert_eq!(AcademiaError::validation("test").code(), "E007");
        assert_eq!(AcademiaError::conflict("test").code(), "E010");
        assert_eq!(AcademiaError::authentication("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            AcademiaError::cache_connection("test").error_type(),
            "Cache Connection Error"
        );
        assert_eq!(
            AcademiaError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = AcademiaError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AcademiaError::validation("x").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AcademiaError::authorization("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AcademiaError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AcademiaError::conflict("x").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AcademiaError::database_operation("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_format_simple() {
        let err = AcademiaError::validation("Invalid URL");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("Invalid URL"));
    }
}
