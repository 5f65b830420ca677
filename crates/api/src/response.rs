//! Shared response body types for API handlers.

use serde::Serialize;

/// `{ "message": ... }` confirmation body, used where an operation has no
/// record to return (e.g. delete).
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
