//! 可插拔对象缓存
//!
//! 后端通过 `declare_object_cache_plugin!` 在进程启动时自注册，
//! 运行时按配置的 `cache.type` 从注册表取构造器。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};
