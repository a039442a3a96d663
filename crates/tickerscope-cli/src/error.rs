use thiserror::Error;

use tickerscope_core::LiveError;

/// Exit code for a company name that did not resolve.
pub const EXIT_NOT_FOUND: u8 = 1;

/// Exit code for an interactive answer other than 1 or 2.
pub const EXIT_INVALID_CHOICE: u8 = 2;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] tickerscope_core::ValidationError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Source(#[from] tickerscope_core::SourceError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("chart rendering failed: {0}")]
    Chart(String),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Source(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
            Self::Chart(_) => 11,
        }
    }
}

impl From<LiveError> for CliError {
    fn from(error: LiveError) -> Self {
        match error {
            LiveError::Source(error) => Self::Source(error),
            LiveError::Output(error) => Self::Io(error),
            LiveError::Encode(error) => Self::Serialization(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickerscope_core::{ProviderId, SourceError};

    #[test]
    fn live_errors_keep_their_category() {
        let source = CliError::from(LiveError::Source(SourceError::status(
            ProviderId::Alphavantage,
            500,
        )));
        assert_eq!(source.exit_code(), 3);

        let io = CliError::from(LiveError::Output(std::io::Error::other("closed")));
        assert_eq!(io.exit_code(), 10);
    }
}
