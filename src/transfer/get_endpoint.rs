//! The route handler for reading a single transfer.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    app_state::AppState,
    response::ApiResponse,
    stores::{AccountStore, BalanceStore, TransferStore},
    transfer::{Transfer, TransferId},
};

/// A route handler for getting a transfer by its ID.
///
/// This function will return the status code 404 if the requested transfer
/// does not exist.
pub async fn get_transfer_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Path(transfer): Path<TransferId>,
) -> Result<Json<ApiResponse<Transfer>>, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let transfer = state.transfers.get(transfer).await?;

    Ok(Json(ApiResponse::new(transfer)))
}
