use thiserror::Error;

#[derive(Debug, Error)]
pub enum NominatimApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid search response: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Search failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Search request timed out after {0}ms")]
    Timeout(u64),
}
