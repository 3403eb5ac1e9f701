use async_trait::async_trait;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq)]
pub enum CacheResult<T> {
    /// 命中
    Found(T),
    /// 未命中
    NotFound,
    /// 键可能存在但取值失败 (后端出错)，调用方按未命中处理
    ExistsButNoValue,
}

/// 对象缓存后端契约
///
/// 统一以字符串存取，调用方负责 serde_json 编解码。
/// 写入与删除都是尽力而为，后端故障不向上传播。
#[async_trait]
pub trait ObjectCache: Send + Sync {
    async fn get_raw(&self, key: &str) -> CacheResult<String>;
    // ttl 为 0 时使用后端的默认 TTL
    async fn insert_raw(&self, key: String, value: String, ttl: u64);
    async fn remove(&self, key: &str);
    async fn invalidate_all(&self);
}

/// 声明一个缓存插件并在进程启动时自动注册
///
/// 后端类型需要提供 `fn new() -> Result<Self, String>`。
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:literal, $backend:ident) => {
        paste::paste! {
            #[ctor::ctor]
            fn [<__register_cache_plugin_ $backend:snake>]() {
                $crate::cache::register::register_object_cache_plugin(
                    $name,
                    std::sync::Arc::new(|| {
                        Box::pin(async {
                            let backend = $backend::new()
                                .map_err($crate::errors::GradeSystemError::cache_connection)?;
                            Ok(Box::new(backend) as Box<dyn $crate::cache::ObjectCache>)
                        })
                            as $crate::cache::register::BoxedObjectCacheFuture
                    }),
                );
            }
        }
    };
}
