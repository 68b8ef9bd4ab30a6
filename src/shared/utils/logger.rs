use log::{debug, error, info, warn};
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

const DEFAULT_FILTER: &str = "info,marquee_lib=debug,diesel=warn,tower_http=info,hyper=warn";

/// Initialize the logging system
/// This should be called once at application startup. `RUST_LOG` overrides the default filter.
/// Records emitted through the `log` macros are routed into the same subscriber.
pub fn init_logger() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        if fmt().with_env_filter(filter).with_target(false).try_init().is_err() {
            eprintln!("Logger already initialized, keeping existing subscriber");
        }

        info!("Logging system initialized");
    });
}

/// Macro for structured logging with context
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

/// Structured logging helpers for common patterns
pub struct LogContext;

impl LogContext {
    /// Log a rating mutation and the movie it touched
    pub fn rating_mutation(action: &str, user_id: &uuid::Uuid, movie_id: &uuid::Uuid) {
        info!("Rating: {} by user {} on movie {}", action, user_id, movie_id);
    }

    /// Log errors with context
    pub fn error_with_context(error: &dyn std::error::Error, context: &str) {
        error!("{}: {}", context, error);
    }

    /// Log performance metrics
    pub fn performance_metric(operation: &str, duration_ms: u64, additional_info: Option<&str>) {
        match additional_info {
            Some(info) => warn!(
                "Performance: {} took {}ms ({})",
                operation, duration_ms, info
            ),
            None => info!("Performance: {} took {}ms", operation, duration_ms),
        }
    }
}

/// Helper for timing operations
pub struct TimedOperation {
    start: std::time::Instant,
    operation: String,
}

impl TimedOperation {
    pub fn new(operation: &str) -> Self {
        debug!("Starting: {}", operation);
        Self {
            start: std::time::Instant::now(),
            operation: operation.to_string(),
        }
    }

    /// Finish and report as slow when the operation exceeded `threshold_ms`
    pub fn finish_with_threshold(self, threshold_ms: u64) -> u64 {
        let duration = self.start.elapsed().as_millis() as u64;
        if duration > threshold_ms {
            LogContext::performance_metric(&self.operation, duration, Some("slow"));
        } else {
            debug!("Finished: {} in {}ms", self.operation, duration);
        }
        duration
    }
}
