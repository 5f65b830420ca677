use civic_core::error::CoreError;

/// Errors surfaced to dashboard callers.
///
/// A failed call never leaves partial state behind: sources either persist
/// the whole change or nothing, and the cache only mirrors confirmed writes.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Input rejected, locally or by the server (HTTP 400).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The addressed record does not exist (HTTP 404 or local miss).
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status not covered above.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The configured base URL cannot address a project.
    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    /// A 2xx response whose body could not be decoded.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error(transparent)]
    Geocoding(#[from] GeocodingError),

    /// Reading or writing the local blob failed.
    #[error("Local storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// The local blob exists but does not decode.
    #[error("Local storage is corrupt: {0}")]
    Corrupt(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub(crate) fn project_not_found(id: impl Into<String>) -> Self {
        ClientError::NotFound {
            entity: "Project",
            id: id.into(),
        }
    }
}

impl From<CoreError> for ClientError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotFound { entity, id } => ClientError::NotFound { entity, id },
            CoreError::Validation(msg) => ClientError::Validation(msg),
            CoreError::Conflict(msg) => ClientError::Validation(msg),
            CoreError::Internal(msg) => ClientError::Corrupt(msg),
        }
    }
}

/// Address resolution failures.
#[derive(Debug, thiserror::Error)]
pub enum GeocodingError {
    #[error("address is empty")]
    EmptyAddress,

    /// No API key configured.
    #[error("geocoding API key is not configured")]
    MissingKey,

    /// The service answered `ZERO_RESULTS`.
    #[error("no results for address '{0}'")]
    NoResults(String),

    /// Any other non-`OK` status from the service.
    #[error("geocoding service returned {status}: {message}")]
    Service { status: String, message: String },

    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),
}
