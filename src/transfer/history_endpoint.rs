//! The route handler for an account's transfer history.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    Error,
    account::AccountRef,
    app_state::AppState,
    response::ApiResponse,
    stores::{AccountStore, BalanceStore, TransferStore},
    transfer::Transfer,
};

/// A route handler returning every transfer touching an account, newest
/// first.
pub async fn transfer_history_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Path(account): Path<String>,
) -> Result<Json<ApiResponse<Vec<Transfer>>>, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let account = AccountRef::new(account);

    let history = state.transfers.history_for(&account).await?;

    Ok(Json(ApiResponse::new(history)))
}
