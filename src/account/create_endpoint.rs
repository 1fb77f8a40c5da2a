//! The route handler for registering accounts.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::{NewAccount, Role},
    app_state::AppState,
    response::ApiResponse,
    stores::{AccountStore, BalanceStore, TransferStore},
};

/// The request body for registering an account.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountData {
    /// The email address to register the account under.
    pub email: String,
    /// The display name of the account holder.
    pub name: String,
    /// The account's role.
    pub role: Role,
    /// The starting point balance. Defaults to zero.
    #[serde(default)]
    pub initial_balance: i64,
}

/// A route handler for registering a new account.
pub async fn create_account_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Json(data): Json<AccountData>,
) -> Result<impl IntoResponse, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let account = state
        .accounts
        .create(NewAccount {
            email: data.email,
            name: data.name,
            role: data.role,
            balance: data.initial_balance,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::new(account))))
}
