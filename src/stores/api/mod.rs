//! Store implementations backed by the remote points API over HTTP.
//!
//! These adapters speak the same REST surface the server exposes, so the
//! transfer engine can run unchanged against a remote backend. Every
//! request carries the configured bearer token, and transport failures
//! surface as [Error::NetworkError](crate::Error::NetworkError).

mod balance;
mod transfer;

use reqwest::StatusCode;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{Error, config::RemoteApiConfig};

pub use balance::ApiBalanceStore;
pub use transfer::ApiTransferStore;

/// The `{ message }` body carried by non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// A thin reqwest wrapper shared by the API-backed stores.
#[derive(Debug, Clone)]
pub(crate) struct ApiClient {
    http: reqwest::Client,
    config: RemoteApiConfig,
}

impl ApiClient {
    pub(crate) fn new(config: RemoteApiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub(crate) fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.get(self.url(path)))
    }

    pub(crate) fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.put(self.url(path)))
    }

    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.http.post(self.url(path)))
    }
}

/// Send `request` and parse a JSON body of type `T` from a 2xx response.
///
/// A 404 becomes [Error::NotFound]; any other non-2xx response or transport
/// failure becomes [Error::NetworkError] carrying the remote `message` when
/// one was provided.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, Error> {
    let response = request
        .send()
        .await
        .map_err(|error| Error::NetworkError(error.to_string()))?;

    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound);
    }

    if !status.is_success() {
        let message = response
            .json::<ErrorBody>()
            .await
            .map(|body| body.message)
            .unwrap_or_else(|_| "no error message provided".to_owned());

        return Err(Error::NetworkError(format!("{status}: {message}")));
    }

    response
        .json()
        .await
        .map_err(|error| Error::NetworkError(error.to_string()))
}
