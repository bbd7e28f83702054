use thiserror::Error;

#[derive(Debug, Error)]
pub enum APIError {
    #[error("HTTP Error")]
    HTTPError(#[from] reqwest::Error),
    #[error("Invalid repository, expected owner/name: {0}")]
    InvalidRepository(String),
}
