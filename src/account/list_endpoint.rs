//! The route handler for the account ranking list.

use axum::{Json, extract::State};

use crate::{
    Error,
    account::Account,
    app_state::AppState,
    response::ApiResponse,
    stores::{AccountStore, BalanceStore, TransferStore},
};

/// A route handler returning every account, highest balance first.
pub async fn list_accounts_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
) -> Result<Json<ApiResponse<Vec<Account>>>, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let accounts = state.accounts.list_by_balance().await?;

    Ok(Json(ApiResponse::new(accounts)))
}
