use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{GradeSystemError, Result};
use crate::services::{AnalyticsService, GradingService};
use crate::storage::sea_orm_storage::SeaOrmStorage;

/// 装配完成的引擎
///
/// storage 以具体类型暴露，调用方（测验/学生生命周期的管理方）
/// 可以直接复用它的连接池与 Provider 实现。
pub struct EngineContext {
    pub storage: Arc<SeaOrmStorage>,
    pub cache: Arc<dyn ObjectCache>,
    pub grading: GradingService,
    pub analytics: AnalyticsService,
}

/// 创建缓存实例
///
/// 按配置的 cache.type 从注册表取构造器；redis 构造失败或
/// 配置了未注册的后端时回退到 moka 内存缓存。
async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    if let Some(constructor) = get_object_cache_plugin(cache_type) {
        match constructor().await {
            Ok(cache) => {
                debug!("已创建 {} 缓存后端", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("创建 {} 缓存失败: {}", cache_type, e);
            }
        }
    } else {
        warn!("缓存后端 '{}' 未注册", cache_type);
    }

    // 回退到内存缓存
    if cache_type != "moka"
        && let Some(fallback) = get_object_cache_plugin("moka")
    {
        warn!("回退到 moka 内存缓存");
        match fallback().await {
            Ok(cache) => return Ok(Arc::from(cache)),
            Err(e) => warn!("创建回退 moka 缓存失败: {}", e),
        }
    }

    Err(GradeSystemError::cache_plugin_not_found(format!(
        "没有可用的缓存后端 (已尝试: {cache_type})"
    )))
}

/// 准备引擎启动的上下文：连接存储、完成迁移、装配缓存与服务
pub async fn prepare_engine_startup() -> Result<EngineContext> {
    // redis 走 TLS 时需要进程级 crypto provider；重复安装返回 Err，可忽略
    let _ = rustls::crypto::ring::default_provider().install_default();

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
    }

    let storage = crate::storage::create_storage().await?;
    debug!("存储后端初始化完成");

    let cache = create_cache().await?;
    debug!("缓存后端初始化完成");

    let grading = GradingService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        cache.clone(),
    );
    let analytics = AnalyticsService::new(
        storage.clone(),
        storage.clone(),
        storage.clone(),
        cache.clone(),
    );

    Ok(EngineContext {
        storage,
        cache,
        grading,
        analytics,
    })
}
