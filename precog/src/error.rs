//! Error types for the predictive safety gate

use thiserror::Error;

/// Result type alias for the safety gate
pub type Result<T> = std::result::Result<T, PrecogError>;

#[derive(Error, Debug)]
pub enum PrecogError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Replay line {line}: {message}")]
    ReplayError { line: usize, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl PrecogError {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn replay<S: Into<String>>(line: usize, msg: S) -> Self {
        Self::ReplayError {
            line,
            message: msg.into(),
        }
    }

    /// True for errors that only affect a single replayed frame
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ReplayError { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_replay_errors_are_recoverable() {
        assert!(PrecogError::replay(3, "bad json").is_recoverable());
        assert!(!PrecogError::config("radius must be positive").is_recoverable());

        let io: PrecogError = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "eof").into();
        assert!(!io.is_recoverable());
        assert_eq!(
            PrecogError::replay(3, "bad json").to_string(),
            "Replay line 3: bad json"
        );
    }
}
