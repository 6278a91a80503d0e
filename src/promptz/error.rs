use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptzError {
    #[error("Prompt not found: {0}")]
    PromptNotFound(i64),

    #[error("Validation Error: {0}")]
    Validation(String),

    #[error("Import rejected:\n{}", .0.join("\n"))]
    Import(Vec<String>),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization Error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP Error: {0}")]
    Http(String),

    #[error("Auth Error: {0}")]
    Auth(String),

    #[error("Store Error: {0}")]
    Store(String),

    #[error("Api Error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for PromptzError {
    fn from(err: reqwest::Error) -> Self {
        if err.status().map(|s| s.as_u16()) == Some(401) {
            PromptzError::Auth(err.to_string())
        } else {
            PromptzError::Http(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, PromptzError>;
