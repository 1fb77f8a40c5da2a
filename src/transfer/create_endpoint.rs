//! The route handler for creating transfers.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::AccountRef,
    app_state::AppState,
    response::ApiResponse,
    stores::{AccountStore, BalanceStore, TransferStore},
    transfer::validator::prepare_transfer,
};

/// The request body for creating a transfer.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferData {
    /// The account the points are taken from.
    pub source_account_id: AccountRef,
    /// The account the points are given to.
    pub destination_account_id: AccountRef,
    /// The number of points to move.
    pub amount: i64,
}

/// A route handler that validates and executes a transfer.
///
/// Validation reads the source balance fresh; scanned QR payment requests
/// are posted here by the client exactly like manually entered transfers,
/// so both paths pass the same checks.
pub async fn create_transfer_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Json(data): Json<TransferData>,
) -> Result<impl IntoResponse, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let intent = prepare_transfer(
        &state.balances,
        &data.source_account_id,
        &data.destination_account_id,
        data.amount,
    )
    .await?;

    let transfer = state.executor.execute(intent).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(transfer))))
}
