use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unsupported media format: {0}")]
    UnsupportedFormat(String),
    #[error("audio decode failed: {0}")]
    Decode(String),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ConvertError {
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    pub fn decode<T: Into<String>>(message: T) -> Self {
        Self::Decode(message.into())
    }
}
