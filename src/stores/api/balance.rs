//! Implements a balance store backed by the remote points API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    account::AccountRef,
    config::RemoteApiConfig,
    endpoints,
    stores::{BalanceStore, api::{ApiClient, send_json}},
};

/// The `{ balance }` body of the balance endpoints.
#[derive(Debug, Serialize, Deserialize)]
struct BalanceBody {
    balance: i64,
}

/// Read and overwrite account point balances over the remote API.
#[derive(Debug, Clone)]
pub struct ApiBalanceStore {
    client: ApiClient,
}

impl ApiBalanceStore {
    /// Create a store talking to the API described by `config`.
    pub fn new(config: RemoteApiConfig) -> Self {
        Self {
            client: ApiClient::new(config),
        }
    }
}

#[async_trait]
impl BalanceStore for ApiBalanceStore {
    async fn balance_of(&self, account: &AccountRef) -> Result<i64, Error> {
        let path = endpoints::account_balance(account);

        let body: BalanceBody = send_json(self.client.get(&path)).await?;

        Ok(body.balance)
    }

    async fn set_balance(&self, account: &AccountRef, new_balance: i64) -> Result<(), Error> {
        if new_balance < 0 {
            return Err(Error::InvalidBalance(new_balance));
        }

        let path = endpoints::account_balance(account);

        let _body: BalanceBody = send_json(
            self.client.put(&path).json(&BalanceBody {
                balance: new_balance,
            }),
        )
        .await?;

        Ok(())
    }

    async fn account_exists(&self, account: &AccountRef) -> Result<bool, Error> {
        match self.balance_of(account).await {
            Ok(_) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(error) => Err(error),
        }
    }
}
