use thiserror::Error;

#[derive(Error, Debug)]
pub enum MorphsegError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Model encode error: {0}")]
    Encode(Box<bincode::error::EncodeError>),

    #[error("Model decode error: {0}")]
    Decode(Box<bincode::error::DecodeError>),

    #[error("The prefix, stem and suffix nonterminals must either all be the same or be pairwise distinct")]
    InvalidLabelScheme,

    #[error("MorphsegError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for MorphsegError {
    fn from(error: std::io::Error) -> Self {
        MorphsegError::Io(Box::new(error))
    }
}

impl From<bincode::error::EncodeError> for MorphsegError {
    fn from(error: bincode::error::EncodeError) -> Self {
        MorphsegError::Encode(Box::new(error))
    }
}

impl From<bincode::error::DecodeError> for MorphsegError {
    fn from(error: bincode::error::DecodeError) -> Self {
        MorphsegError::Decode(Box::new(error))
    }
}
