use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize dotenvy
pub fn init_env() {
    dotenvy::dotenv().ok();
}

/// Default `EnvFilter` directives when `RUST_LOG` is unset
pub fn default_filter(service_name: &str) -> String {
    format!("info,{}=debug", service_name.replace('-', "_"))
}

/// File name for a JSON log written by `service_name`, stamped with local start time
pub fn log_file_name(service_name: &str) -> String {
    let now = chrono::Local::now().format("%y-%m-%d-%H-%M-%S").to_string();
    format!("cadence-{}.log.{}.jsonl", service_name, now)
}

/// Initialize tracing with optional file logging
///
/// Human-readable output goes to stderr so stdout stays free for command
/// output. When `LOG_DIR` is set, a JSON copy is also written there; the
/// returned guard flushes it and must be held until exit.
pub fn init_tracing(service_name: &str) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(service_name).into());

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer);

    match std::env::var("LOG_DIR") {
        Ok(log_dir) if !log_dir.trim().is_empty() => {
            let file_appender =
                tracing_appender::rolling::never(log_dir, log_file_name(service_name));
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let file_layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(non_blocking)
                .json();

            registry.with(file_layer).init();

            Some(guard)
        }
        _ => {
            registry.init();
            None
        }
    }
}
