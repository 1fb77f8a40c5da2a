//! Bearer token middleware guarding the mutating API routes.

use axum::{
    Json, RequestPartsExt,
    extract::{FromRef, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde_json::json;

use crate::{
    app_state::AppState,
    stores::{AccountStore, BalanceStore, TransferStore},
};

/// The state needed for the bearer token middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    /// The token mutating requests must present. `None` disables the guard,
    /// for single-user local deployments.
    pub api_token: Option<String>,
}

impl<A, B, T> FromRef<AppState<A, B, T>> for AuthState
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    fn from_ref(state: &AppState<A, B, T>) -> Self {
        Self {
            api_token: state.api_token.clone(),
        }
    }
}

/// Middleware function that checks for a valid `Authorization: Bearer`
/// header when the server was started with an API token.
///
/// Requests with a missing or mismatched token receive a 401 response with
/// a JSON `{ message }` body and are not passed further.
pub async fn bearer_guard(
    State(auth): State<AuthState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = &auth.api_token else {
        return next.run(request).await;
    };

    let (mut parts, body) = request.into_parts();

    match parts.extract::<TypedHeader<Authorization<Bearer>>>().await {
        Ok(TypedHeader(Authorization(bearer))) if bearer.token() == expected => {
            next.run(Request::from_parts(parts, body)).await
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "A valid bearer token is required." })),
        )
            .into_response(),
    }
}
