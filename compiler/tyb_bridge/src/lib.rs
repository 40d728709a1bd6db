//! Compilation session for the type bridge.
//!
//! A [`Session`] owns the model, the declaration loader and the diagnostic
//! configuration for one run. [`Session::compile_unit`] turns the analyzer
//! declarations of a unit into synthetic class definitions, attributing any
//! failure to the declaration that caused it and carrying on with its
//! siblings. [`emit`] lowers those definitions into artifacts the loader
//! can read back.

mod config;
pub mod emit;
mod session;

use std::sync::Once;

pub use config::BridgeConfig;
pub use session::{Session, UnitOutput};

/// Environment variable holding the tracing filter directives.
pub const LOG_ENV: &str = "TYB_LOG";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Enable with `TYB_LOG=tyb_loader=debug` or
/// `TYB_LOG=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var(LOG_ENV).is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(EnvFilter::from_env(LOG_ENV))
                .init();
        }
    });
}
