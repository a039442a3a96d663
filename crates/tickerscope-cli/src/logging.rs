use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CliError;

/// Default filter for a `-v` count; `RUST_LOG` wins when set.
fn default_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "tickerscope=warn,tickerscope_core=warn",
        1 => "tickerscope=info,tickerscope_core=info",
        _ => "tickerscope=debug,tickerscope_core=debug",
    }
}

/// Installs a compact stderr subscriber so stdout carries only command output.
pub fn init_logging(verbosity: u8) -> Result<(), CliError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbosity)));

    let format_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(format_layer)
        .try_init()
        .map_err(|error| CliError::Command(format!("failed to initialise logging: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_both_crates_together() {
        assert_eq!(default_directives(0), "tickerscope=warn,tickerscope_core=warn");
        assert!(default_directives(1).contains("tickerscope_core=info"));
        assert!(default_directives(7).contains("tickerscope=debug"));
    }
}
