// Course Registry - Core Library
// Exposes the relational store and its adapters for the TUI, API server, and tests

pub mod config;
pub mod entities;
pub mod error;
pub mod forms;
pub mod store;
pub mod views;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::{load_config, NamePolicy, RegistryConfig, ServerConfig, StoreConfig};
pub use entities::{Course, CourseType, EntityKind, Registration};
pub use error::{Result, StoreError};
pub use forms::{CourseForm, CourseTypeForm, FormError, RegistrationForm};
pub use store::{CourseFilter, RelationalStore};
pub use views::{CourseView, RegistrationView, Resolved, StoreStats};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Install the tracing subscriber used by both binaries
///
/// `filter` is an `EnvFilter` directive such as `info` or `course_registry=debug`.
pub fn init_logging(filter: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));

    // A second init (e.g. from tests) is harmless
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}
