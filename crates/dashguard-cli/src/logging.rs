//! Scoped logging.
//!
//! Each binary owns a [`LogContext`] for the lifetime of `main`. The subscriber is
//! installed as the thread's default rather than globally, and is removed again when
//! the context is dropped. Events go to stderr so reports on stdout stay clean.

use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;

#[must_use = "logging stops when the context is dropped"]
pub struct LogContext {
    _guard: DefaultGuard,
}

impl LogContext {
    /// `RUST_LOG` when set, otherwise `info`.
    pub fn install() -> Self {
        Self::with_default_filter("info")
    }

    pub fn with_default_filter(directives: &str) -> Self {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .finish();
        Self {
            _guard: tracing::subscriber::set_default(subscriber),
        }
    }
}
