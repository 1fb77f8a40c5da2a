//! Application router configuration with open and token-guarded route
//! definitions.

use axum::{
    Router,
    extract::FromRef,
    middleware,
    routing::{get, post, put},
};

use crate::{
    account::{
        create_account_endpoint, get_balance_endpoint, list_accounts_endpoint,
        set_balance_endpoint,
    },
    app_state::AppState,
    auth::{AuthState, bearer_guard},
    endpoints,
    qr::payment_request_endpoint,
    stores::{AccountStore, BalanceStore, TransferStore},
    transfer::{
        append_record_endpoint, create_transfer_endpoint, get_transfer_endpoint,
        transfer_history_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// Read-only routes are open; mutating routes pass through the bearer token
/// guard, which is a no-op when the state carries no API token.
pub fn build_router<A, B, T>(state: AppState<A, B, T>) -> Router
where
    A: AccountStore + Clone + Send + Sync + 'static,
    B: BalanceStore + Clone + Send + Sync + 'static,
    T: TransferStore + Clone + Send + Sync + 'static,
{
    let open_routes = Router::new()
        .route(endpoints::ACCOUNTS, get(list_accounts_endpoint::<A, B, T>))
        .route(
            endpoints::ACCOUNT_BALANCE,
            get(get_balance_endpoint::<A, B, T>),
        )
        .route(
            endpoints::ACCOUNT_TRANSFERS,
            get(transfer_history_endpoint::<A, B, T>),
        )
        .route(
            endpoints::ACCOUNT_PAYMENT_REQUEST,
            get(payment_request_endpoint::<A, B, T>),
        )
        .route(endpoints::TRANSFER, get(get_transfer_endpoint::<A, B, T>));

    let guarded_routes = Router::new()
        .route(endpoints::ACCOUNTS, post(create_account_endpoint::<A, B, T>))
        .route(
            endpoints::ACCOUNT_BALANCE,
            put(set_balance_endpoint::<A, B, T>),
        )
        .route(
            endpoints::TRANSFERS,
            post(create_transfer_endpoint::<A, B, T>),
        )
        .route(
            endpoints::TRANSFER_RECORDS,
            post(append_record_endpoint::<A, B, T>),
        )
        .layer(middleware::from_fn_with_state(
            AuthState::from_ref(&state),
            bearer_guard,
        ));

    open_routes.merge(guarded_routes).with_state(state)
}
