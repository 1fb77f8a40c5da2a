//! The route handler for raw transfer record appends.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::AccountRef,
    app_state::AppState,
    response::ApiResponse,
    stores::{AccountStore, BalanceStore, TransferStore},
    transfer::{NewTransfer, TransferStatus},
};

/// The request body for appending a transfer record.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordData {
    /// The account the points were taken from.
    pub source: AccountRef,
    /// The account the points were given to.
    pub destination: AccountRef,
    /// The number of points moved.
    pub amount: i64,
    /// The state of the transfer.
    pub status: TransferStatus,
}

/// A route handler appending a transfer record without touching balances.
///
/// This is the endpoint the remote store adapters write through after they
/// have applied the balance changes themselves; the balance-mutating
/// transfer path is the transfers endpoint.
pub async fn append_record_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Json(data): Json<RecordData>,
) -> Result<impl IntoResponse, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let transfer = state
        .transfers
        .append(NewTransfer {
            source: data.source,
            destination: data.destination,
            amount: data.amount,
            status: data.status,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(transfer))))
}
