#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Server responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("API reported an error: {0}")]
    Api(String),
    #[error("Failed to decode response: {0}")]
    Decode(String),
}
