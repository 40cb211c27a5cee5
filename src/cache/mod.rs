//! 对象缓存层
//!
//! 后端以插件形式注册（见 [`declare_object_cache_plugin!`]），启动时按配置名称选择。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端异常，无法判断键是否存在
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// `ttl` 为 0 时使用默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 注册缓存插件
///
/// 插件类型需提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $ty:ty) => {
        #[ctor::ctor]
        fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    Box::pin(async {
                        <$ty>::new()
                            .map(|cache| {
                                Box::new(cache) as Box<dyn $crate::cache::ObjectCache>
                            })
                            .map_err($crate::errors::AcademiaError::cache_connection)
                    }) as $crate::cache::register::BoxedObjectCacheFuture
                }),
            );
        }
    };
}

/// 已认证用户的缓存键；角色、权限或资料变化时删除
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}
