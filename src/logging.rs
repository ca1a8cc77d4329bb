#![forbid(unsafe_code)]

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::pak::{PakError, PakResult};

fn default_directive(verbose: bool) -> String {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    format!("pakker={level}")
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`. A
/// subscriber that is already installed is kept.
pub fn init_logging(verbose: bool) -> PakResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(verbose)))
        .map_err(|e| PakError::InvalidArgument(format!("log filter: {e}")))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .compact();

    if tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("subscriber already installed");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_selects_debug() {
        assert_eq!(default_directive(true), "pakker=DEBUG");
        assert_eq!(default_directive(false), "pakker=INFO");
    }

    #[test]
    fn directive_parses() {
        assert!(EnvFilter::try_new(default_directive(false)).is_ok());
    }

    #[test]
    fn second_init_keeps_first_subscriber() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        assert!(init_logging(false).is_ok());
        assert!(init_logging(true).is_ok());
    }
}
