//! Implements a transfer record store backed by the remote points API.

use async_trait::async_trait;
use serde::Serialize;

use crate::{
    Error,
    account::AccountRef,
    config::RemoteApiConfig,
    endpoints,
    response::ApiResponse,
    stores::{TransferStore, api::{ApiClient, send_json}},
    transfer::{NewTransfer, Transfer, TransferId, TransferStatus},
};

/// The body posted to the record append endpoint.
#[derive(Debug, Serialize)]
struct AppendRecordBody<'a> {
    source: &'a AccountRef,
    destination: &'a AccountRef,
    amount: i64,
    status: TransferStatus,
}

/// Append and retrieve transfer records over the remote API.
#[derive(Debug, Clone)]
pub struct ApiTransferStore {
    client: ApiClient,
}

impl ApiTransferStore {
    /// Create a store talking to the API described by `config`.
    pub fn new(config: RemoteApiConfig) -> Self {
        Self {
            client: ApiClient::new(config),
        }
    }
}

#[async_trait]
impl TransferStore for ApiTransferStore {
    async fn append(&self, new_transfer: NewTransfer) -> Result<Transfer, Error> {
        let body = AppendRecordBody {
            source: &new_transfer.source,
            destination: &new_transfer.destination,
            amount: new_transfer.amount,
            status: new_transfer.status,
        };

        let envelope: ApiResponse<Transfer> = send_json(
            self.client.post(endpoints::TRANSFER_RECORDS).json(&body),
        )
        .await?;

        Ok(envelope.data)
    }

    async fn get(&self, id: TransferId) -> Result<Transfer, Error> {
        let path = endpoints::transfer(id);

        let envelope: ApiResponse<Transfer> = send_json(self.client.get(&path)).await?;

        Ok(envelope.data)
    }

    async fn history_for(&self, account: &AccountRef) -> Result<Vec<Transfer>, Error> {
        let path = endpoints::account_transfers(account);

        let envelope: ApiResponse<Vec<Transfer>> = send_json(self.client.get(&path)).await?;

        Ok(envelope.data)
    }
}
