use thiserror::Error;

#[derive(Error, Debug)]
pub enum FixerError {
    #[error("No issue keys found: {0}")]
    NoIssueKeysFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, FixerError>;
