//! Tracing subscriber setup

use std::io::IsTerminal;

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber, logging to stderr.
///
/// `--verbose` forces `debug`; otherwise `RUST_LOG` applies, defaulting
/// to `warn` so unused macro parameters are always reported.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(verbose)
        .compact();

    let filter_layer = if verbose {
        EnvFilter::try_new("debug")?
    } else {
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_init_once() {
        // Only the first init in a process can succeed
        let _ = init(false);
        assert!(init(true).is_err());
        tracing::warn!("still logging");
    }
}
