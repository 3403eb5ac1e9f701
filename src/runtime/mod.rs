//! 引擎运行时装配
//!
//! 引擎以库的形式嵌入调用方进程，这里只负责两件事：日志订阅器
//! 的幂等安装，以及存储、缓存与两个服务的装配。进程生命周期
//! （信号、退出）始终归宿主所有。

pub mod logging;
pub mod startup;

pub use startup::{EngineContext, prepare_engine_startup};
