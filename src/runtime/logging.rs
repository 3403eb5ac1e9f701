//! 日志初始化
//!
//! 开发环境输出带文件名与行号的彩色文本，生产环境输出 JSON。
//! 宿主进程可能已装好自己的订阅器，安装采用 try_init：失败时
//! 静默让位，引擎的 tracing 调用汇入宿主的订阅器。

use tracing_appender::non_blocking::WorkerGuard;

use crate::config::AppConfig;

/// 安装全局日志订阅器
///
/// 返回的 guard 负责冲刷非阻塞写入缓冲，调用方应持有它直到
/// 进程结束；返回 None 表示宿主已装过订阅器。
pub fn init_tracing() -> Option<WorkerGuard> {
    let config = AppConfig::get();

    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    let installed = if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        tracing_builder.json().try_init()
    };

    match installed {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}
