use thiserror::Error;

/// All different error types this crate uses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PressespiegelError {
    /// A keyword or crawl configuration violates its requirements.
    #[error("Invalid configuration: {reason}")]
    Configuration {
        /// What is wrong with the configuration.
        reason: String,
    },
    /// The caller handed over input that can not be evaluated.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// What is wrong with the input.
        reason: String,
    },
    /// A date in the settings or an article could not be parsed.
    #[error("Failed to parse date `{input}`")]
    UnparsableDate {
        /// The offending date string.
        input: String,
    },
    /// Unknown topic identifier.
    #[error("Unknown topic `{0}`")]
    UnknownTopic(String),
}

impl PressespiegelError {
    pub(crate) fn configuration<T: ToString>(reason: T) -> Self {
        PressespiegelError::Configuration {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_input<T: ToString>(reason: T) -> Self {
        PressespiegelError::InvalidInput {
            reason: reason.to_string(),
        }
    }
}
