use paths::PathContext;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Holds the path context, version info and the log writer's guard.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    pub log_file: PathBuf,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
}

/// Builder that sets up paths and logging before anything else runs.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context (platform-specific directories)
    /// - Ensures the log directory exists
    /// - Initializes logging to a per-run file
    ///
    /// `log_level` is an `EnvFilter` directive used when `RUST_LOG` is not
    /// set. Nothing is logged to the console, the terminal belongs to the UI.
    pub fn new(version: &'static str, log_level: Option<&str>) -> Result<Self, BoxError> {
        let app_id = A::APP_ID;

        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            std::env::current_dir()?,
            app_id,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(app_id);

        path_context.ensure_directories()?;

        let log_file = path_context.log_file_now();
        let log_dir = log_file
            .parent()
            .ok_or("log file path should have parent directory")?;
        let log_filename = log_file
            .file_name()
            .ok_or("log file path should have filename")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let file_layer = fmt::Layer::default()
            .with_target(false)
            .with_ansi(false)
            .with_file(true)
            .with_line_number(true)
            .with_writer(non_blocking)
            .with_filter(env_filter(log_level));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(ErrorLayer::default())
            .try_init()?;

        tracing::info!(
            app = app_id,
            version,
            environment = ?path_context.environment(),
            log = %log_file.display(),
            "logging initialized"
        );

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                log_file,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Returns the `AppContext`; keep it alive until the process exits.
    pub fn build(self) -> AppContext {
        self.context
    }
}

fn default_level() -> &'static str {
    if cfg!(debug_assertions) {
        "info"
    } else {
        "warn"
    }
}

/// `RUST_LOG` wins, then the configured directive, then the build default.
fn env_filter(log_level: Option<&str>) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    log_level
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_level_is_used_without_rust_log() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }

        assert_eq!(env_filter(Some("debug")).to_string(), "debug");
        assert_eq!(env_filter(None).to_string(), default_level());
        // unparsable directives fall back to the default
        assert_eq!(env_filter(Some("w101=loud")).to_string(), default_level());
    }
}
