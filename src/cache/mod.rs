//! 对象缓存
//!
//! 缓存后端以插件形式注册到 [`register`] 中的注册表，启动时按配置的类型名构造。
//! 值统一以 JSON 字符串保存。

pub mod object_cache;
pub mod register;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult<T> {
    Found(T),
    NotFound,
    // 键存在但值不可用（例如已过期或被占位）
    ExistsButNoValue,
}

#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 读取并反序列化，反序列化失败的条目会被移除
pub async fn get_json<T: DeserializeOwned>(cache: &dyn ObjectCache, key: &str) -> Option<T> {
    match cache.get_raw(key).await {
        CacheResult::Found(json) => match serde_json::from_str::<T>(&json) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::info!("Failed to deserialize cached value for key {}: {}", key, e);
                cache.remove(key).await;
                None
            }
        },
        _ => None,
    }
}

/// 序列化后写入
pub async fn insert_json<T: Serialize>(cache: &dyn ObjectCache, key: &str, value: &T, ttl: u64) {
    match serde_json::to_string(value) {
        Ok(json) => cache.insert_raw(key.to_string(), json, ttl).await,
        Err(e) => tracing::warn!("Failed to serialize value for key {}: {}", key, e),
    }
}

/// 声明缓存插件，生成 `register()` 函数
///
/// 插件类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        pub fn register() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| -> $crate::cache::register::BoxedObjectCacheFuture {
                    Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::EvalSystemError::cache_connection)?;
                        let cache: Box<dyn $crate::cache::ObjectCache> = Box::new(cache);
                        Ok::<_, $crate::errors::EvalSystemError>(cache)
                    })
                }),
            );
        }
    };
}
