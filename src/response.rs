//! The JSON envelope wrapping successful API responses.

use serde::{Deserialize, Serialize};

/// A `{ success, data }` wrapper around a response payload.
///
/// Non-2xx responses carry a `{ message }` body instead; see
/// [Error](crate::Error)'s `IntoResponse` impl.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` for responses produced by this type.
    pub success: bool,
    /// The response payload.
    pub data: T,
}

impl<T> ApiResponse<T> {
    /// Wrap `data` in a successful envelope.
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
