/// Failure taxonomy for one lookup attempt. An empty result set is not an
/// error; it is represented as a successful search with zero candidates.
#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("api returned status {0}")]
    HttpStatus(u16),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("browser session unavailable: {0}")]
    NotInitialized(String),

    #[error("lookup cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Transport(err.to_string())
    }
}
