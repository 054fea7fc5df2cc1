use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initializes tracing with a console layer and a daily-rolling JSON file
/// layer under `logs/`. Honors `RUST_LOG` overrides.
pub fn init_logging() {
    let _ = std::fs::create_dir_all("logs");

    let file_appender = tracing_appender::rolling::daily("logs", "hoopstats.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::from_default_env()
        .add_directive("hoopstats=info".parse().expect("static directive"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().json().with_writer(file_writer))
        .with(fmt::layer().with_writer(std::io::stdout))
        .init();

    // Leak the guard so buffered log lines are flushed for the process lifetime.
    std::mem::forget(guard);
}
