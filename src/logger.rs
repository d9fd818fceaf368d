use tracing_subscriber::EnvFilter;

/// 根据日志指令构建过滤器。设置了 `RUST_LOG` 时以环境变量为准。
fn build_filter(directive: &str) -> EnvFilter {
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
        EnvFilter::builder().from_env_lossy()
    } else {
        EnvFilter::builder().parse_lossy(directive)
    }
}

/// 初始化全局日志。重复调用时保留第一次的配置。
pub fn init(directive: &str) {
    let _ = tracing_subscriber::fmt::fmt()
        .with_env_filter(build_filter(directive))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
