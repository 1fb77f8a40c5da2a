//! The route handler serving payment request QR images.

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
};
use serde::Deserialize;

use crate::{
    Error,
    account::AccountRef,
    app_state::AppState,
    qr::codec::{PaymentRequest, encode_payment_request_png},
    stores::{AccountStore, BalanceStore, TransferStore},
};

/// The query parameters for the payment request endpoint.
#[derive(Debug, Deserialize)]
pub struct PaymentRequestParams {
    /// The number of points the account wants to receive.
    pub amount: i64,
}

/// A route handler rendering a payment request QR image for an account.
///
/// Returns 404 for unknown accounts, so codes cannot be generated for
/// recipients that do not exist.
pub async fn payment_request_endpoint<A, B, T>(
    State(state): State<AppState<A, B, T>>,
    Path(account): Path<String>,
    Query(params): Query<PaymentRequestParams>,
) -> Result<impl IntoResponse, Error>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    let account = AccountRef::new(account);

    if !state.balances.account_exists(&account).await? {
        return Err(Error::NotFound);
    }

    let png = encode_payment_request_png(&PaymentRequest {
        identifier: account,
        amount: params.amount,
    })?;

    Ok(([(header::CONTENT_TYPE, "image/png")], png))
}
