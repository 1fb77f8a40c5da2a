//! Defines the app level error type and its conversion to JSON API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::account::AccountRef;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A transfer was requested with a zero or negative amount.
    #[error("{0} is not a valid transfer amount, amounts must be positive")]
    InvalidAmount(i64),

    /// A transfer was requested with the same account as source and
    /// destination.
    #[error("an account cannot transfer points to itself")]
    SelfTransfer,

    /// The transfer recipient does not match any known account.
    #[error("no account matches the recipient \"{0}\"")]
    RecipientNotFound(AccountRef),

    /// The source account's balance does not cover the requested amount.
    #[error("insufficient points: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The amount the transfer asked for.
        requested: i64,
        /// The source balance at the time of the check.
        available: i64,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the account
    /// reference or id is correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The email used to create an account is already registered.
    #[error("the account \"{0}\" already exists")]
    DuplicateAccount(String),

    /// A balance overwrite was requested with a negative value.
    #[error("{0} is not a valid balance, balances must not be negative")]
    InvalidBalance(i64),

    /// A QR payload was readable but did not contain a valid payment request.
    #[error("malformed payment request: {0}")]
    MalformedPayload(String),

    /// A payment request could not be rendered as a QR image.
    #[error("could not encode payment request: {0}")]
    QrEncoding(String),

    /// A transfer failed while mutating balances or appending its record.
    ///
    /// The wrapped error is the underlying cause. It is logged on the server;
    /// clients only receive a generic failure message.
    #[error("the transfer could not be completed: {0}")]
    TransferFailed(Box<Error>),

    /// The remote balance API could not be reached or returned an unexpected
    /// response.
    #[error("remote API error: {0}")]
    NetworkError(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLock,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, message) = match &self {
            Error::InvalidAmount(_)
            | Error::SelfTransfer
            | Error::InsufficientFunds { .. }
            | Error::InvalidBalance(_)
            | Error::DuplicateAccount(_)
            | Error::MalformedPayload(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            Error::RecipientNotFound(_) | Error::NotFound => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            Error::NetworkError(_) => {
                tracing::error!("remote API request failed: {}", self);
                (
                    StatusCode::BAD_GATEWAY,
                    "The remote points service could not be reached.".to_owned(),
                )
            }
            // Any errors that are not handled above are not intended to be
            // shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Something went wrong, check the server logs for more details.".to_owned(),
                )
            }
        };

        (status_code, Json(json!({ "message": message }))).into_response()
    }
}
