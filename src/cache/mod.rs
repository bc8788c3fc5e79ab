//! 对象缓存
//!
//! 缓存后端以插件形式注册到全局注册表，启动时按 `cache.type` 选择。
//! 当前用于缓存已认证用户（键 `user:<token>`），避免每个请求都查询存储。

pub mod object_cache;
pub mod register;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::AppConfig;
use crate::errors::{GradebookError, Result};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    /// 后端出错，值状态未知
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    /// ttl 为 0 时使用后端默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 注册内置缓存插件
pub fn register_builtin_plugins() {
    object_cache::moka::register();
    object_cache::redis::register();
    register::debug_object_cache_registry();
}

/// 按配置创建缓存，配置的插件不可用时回退到 moka
pub async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let cache_type = config.cache.cache_type.as_str();

    let constructor = register::get_object_cache_plugin(cache_type).ok_or_else(|| {
        GradebookError::cache_plugin_not_found(format!("Cache plugin not found: {cache_type}"))
    })?;

    match constructor().await {
        Ok(cache) => {
            debug!("Object cache initialized: {}", cache_type);
            Ok(Arc::from(cache))
        }
        Err(e) if cache_type != object_cache::moka::PLUGIN_NAME => {
            warn!(
                "Failed to initialize cache '{}': {}, falling back to moka",
                cache_type, e
            );
            let fallback = register::get_object_cache_plugin(object_cache::moka::PLUGIN_NAME)
                .ok_or_else(|| {
                    GradebookError::cache_plugin_not_found("Cache plugin not found: moka")
                })?;
            Ok(Arc::from(fallback().await?))
        }
        Err(e) => Err(e),
    }
}
