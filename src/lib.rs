//! Luka Points is a loyalty-points service connecting students, companies,
//! and administrators around a points currency moved by peer-to-peer
//! transfers.
//!
//! This library provides the transfer engine (balance stores, validation,
//! execution, and QR payment requests) plus a REST API server that exposes
//! it. Balances live behind the [stores::BalanceStore] trait with an
//! embedded SQLite backend and a remote HTTP backend, so the engine runs
//! unchanged against either.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod account;
mod app_state;
mod auth;
mod config;
mod db;
pub mod endpoints;
mod error;
mod qr;
mod response;
mod routing;
pub mod stores;
mod transfer;

pub use account::{Account, AccountData, AccountId, AccountRef, BalanceData, NewAccount, Role};
pub use app_state::{AppState, SqliteAppState, create_app_state};
pub use config::{DEFAULT_REMOTE_API_URL, RemoteApiConfig};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use qr::{
    FrameSource, PaymentRequest, QR_MIN_SIZE, ScanState, Scanner, decode_payment_request,
    encode_payment_request, encode_payment_request_png, scan_until_decoded,
};
pub use response::ApiResponse;
pub use routing::build_router;
pub use transfer::{
    ExecutionMode, NewTransfer, RecordData, Transfer, TransferData, TransferExecutor, TransferId,
    TransferIntent, TransferStatus, prepare_transfer, validate_transfer,
};

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down
/// gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
