use thiserror::Error;

/// Raised when a caller hands us a parameter that cannot produce a meaningful
/// result, such as an empty pixel grid or a color map with unordered keyframes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParameterError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ParameterError {
    pub fn invalid_argument<S: Into<String>>(message: S) -> ParameterError {
        ParameterError::InvalidArgument(message.into())
    }
}
