//! The route handlers for reading and overwriting an account's balance.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::AccountRef,
    app_state::AppState,
    stores::{AccountStore, BalanceStore, TransferStore},
};

/// The `{ balance }` body used by both balance endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct BalanceData {
    /// The account's point balance.
    pub balance: i64,
}

/// A route handler returning the current balance of an account.
pub async fn get_balance_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Path(account): Path<String>,
) -> Result<Json<BalanceData>, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let account = AccountRef::new(account);

    let balance = state.balances.balance_of(&account).await?;

    Ok(Json(BalanceData { balance }))
}

/// A route handler overwriting the balance of an account.
///
/// This is the administrative point grant path; ordinary point movement
/// goes through the transfer endpoint.
pub async fn set_balance_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Path(account): Path<String>,
    Json(data): Json<BalanceData>,
) -> Result<Json<BalanceData>, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let account = AccountRef::new(account);

    state.balances.set_balance(&account, data.balance).await?;

    Ok(Json(BalanceData {
        balance: data.balance,
    }))
}
