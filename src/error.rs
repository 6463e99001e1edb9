use thiserror::Error;

#[derive(Error, Debug)]
pub enum TedError {
    #[error("This video may not be available: {0}")]
    StreamUnavailable(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Player error: {0}")]
    Player(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, TedError>;
