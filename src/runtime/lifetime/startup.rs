use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::AcademiaError;
use crate::models::users::entities::RoleCode;
use crate::models::users::requests::NewUser;
use crate::storage::Storage;
use crate::tasks::{self, TaskQueue};
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub queue: TaskQueue,
}

async fn try_cache_backend(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 moka
async fn create_cache() -> Result<Arc<dyn ObjectCache>, AcademiaError> {
    let cache_type = &AppConfig::get().cache.cache_type;
    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(cache) = try_cache_backend(cache_type).await {
        return Ok(cache);
    }
    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = try_cache_backend("moka").await {
            return Ok(cache);
        }
    }

    Err(AcademiaError::cache_connection(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 没有超级管理员时创建默认账号
async fn seed_super_admin(storage: &Arc<dyn Storage>) {
    match storage.count_users_with_role(RoleCode::SuperAdmin).await {
        Ok(count) if count > 0 => {
            debug!("Found {} super admin account(s), skipping seed", count);
            return;
        }
        Ok(_) => info!("No super admin found, creating default account..."),
        Err(e) => {
            warn!("Failed to count super admins: {}, skipping seed", e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated admin password: {}", pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash admin password: {}, skipping seed", e);
            return;
        }
    };

    let admin = NewUser {
        username: DEFAULT_ADMIN_USERNAME.to_string(),
        email: std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@localhost".to_string()),
        password_hash,
        first_name: "Super".to_string(),
        last_name: "Admin".to_string(),
        document_number: None,
        faculty_id: None,
        career_id: None,
        roles: vec![RoleCode::SuperAdmin],
    };

    match storage.create_user(admin).await {
        Ok(user) => info!(
            "Default super admin created (ID: {}, username: {})",
            user.id, user.username
        ),
        Err(e) => warn!("Failed to create super admin account: {}", e),
    }
}

/// 准备服务器启动的上下文：存储、缓存和后台任务
pub async fn prepare_server_startup() -> Result<StartupContext, AcademiaError> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        debug!(
            "Registered cache plugins: {:?}",
            crate::cache::register::registered_object_cache_plugins()
        );
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_super_admin(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    let queue = tasks::start(storage.clone());
    warn!("Background task queue started");

    Ok(StartupContext {
        storage,
        cache,
        queue,
    })
}
