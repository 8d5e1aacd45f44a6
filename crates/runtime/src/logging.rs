//! Tracing subscriber setup for hosts embedding the runtime.
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use crate::error::{Result, RuntimeError};

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` plus `directive`
/// (e.g. `"info"` or `"tile_core=debug"`).
///
/// # Errors
///
/// Fails on an unparsable directive, or when a global subscriber is already
/// installed. A second call is therefore harmless.
pub fn init_tracing(directive: &str) -> Result<()> {
    let parsed: Directive = directive
        .parse()
        .map_err(|source| RuntimeError::LogDirective {
            directive: directive.to_owned(),
            source,
        })?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(parsed))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| RuntimeError::LoggingInit {
            reason: err.to_string(),
        })
}
