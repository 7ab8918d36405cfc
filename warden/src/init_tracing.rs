use anyhow::Result;
use tracing::{debug, Subscriber};
use tracing_subscriber::{layer::SubscriberExt, registry, registry::LookupSpan, EnvFilter, Layer};

pub fn build_reduced_logger_text<S>() -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    if cfg!(debug_assertions) {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_line_number(false)
                .with_thread_names(false)
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true)
                .with_span_events(tracing_subscriber::fmt::format::FmtSpan::NONE)
                .event_format(tracing_subscriber::fmt::format().compact()),
        )
    } else {
        Box::new(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_timer(tracing_subscriber::fmt::time::SystemTime)
                .with_target(true),
        )
    }
}

/// `RUST_LOG` wins over the configured level, which defaults to `warn`
pub fn build_loglevel_filter_layer(log_level: Option<&str>) -> EnvFilter {
    let directives = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| log_level.map(str::to_string))
        .unwrap_or_else(|| "warn".to_string());
    EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init_tracing(log_level: Option<&str>) -> Result<()> {
    let subscriber = registry()
        .with(build_loglevel_filter_layer(log_level))
        .with(build_reduced_logger_text());
    tracing::subscriber::set_global_default(subscriber)?;
    debug!("Logging initialized");
    Ok(())
}
