//! Implements a SQLite backed transfer record store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;
use time::OffsetDateTime;

use crate::{
    Error,
    account::AccountRef,
    stores::TransferStore,
    transfer::{NewTransfer, Transfer, TransferId, map_transfer_row},
};

/// Append and retrieve transfer records in the embedded database.
#[derive(Debug, Clone)]
pub struct SqliteTransferStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteTransferStore {
    /// Create a new store from the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl TransferStore for SqliteTransferStore {
    async fn append(&self, new_transfer: NewTransfer) -> Result<Transfer, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let created_at = OffsetDateTime::now_utc();

        connection
            .prepare(
                "INSERT INTO transfer (source, destination, amount, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 RETURNING id, source, destination, amount, status, created_at",
            )?
            .query_row(
                (
                    new_transfer.source.as_str(),
                    new_transfer.destination.as_str(),
                    new_transfer.amount,
                    new_transfer.status.as_str(),
                    created_at,
                ),
                map_transfer_row,
            )
            .map_err(|error| error.into())
    }

    async fn get(&self, id: TransferId) -> Result<Transfer, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection
            .prepare(
                "SELECT id, source, destination, amount, status, created_at
                 FROM transfer WHERE id = :id",
            )?
            .query_row(&[(":id", &id)], map_transfer_row)
            .map_err(|error| error.into())
    }

    async fn history_for(&self, account: &AccountRef) -> Result<Vec<Transfer>, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        // Sort by timestamp, then ID, so records stamped within the same
        // second still come back newest first.
        connection
            .prepare(
                "SELECT id, source, destination, amount, status, created_at
                 FROM transfer
                 WHERE source = :account OR destination = :account
                 ORDER BY datetime(created_at) DESC, id DESC",
            )?
            .query_map(&[(":account", account.as_str())], map_transfer_row)?
            .map(|maybe_transfer| maybe_transfer.map_err(|error| error.into()))
            .collect()
    }
}

#[cfg(test)]
mod sqlite_transfer_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        account::AccountRef,
        db::initialize,
        stores::TransferStore,
        transfer::{NewTransfer, TransferStatus},
    };

    use super::SqliteTransferStore;

    fn get_test_store() -> SqliteTransferStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SqliteTransferStore::new(Arc::new(Mutex::new(connection)))
    }

    fn transfer_between(source: &str, destination: &str, amount: i64) -> NewTransfer {
        NewTransfer {
            source: AccountRef::new(source),
            destination: AccountRef::new(destination),
            amount,
            status: TransferStatus::Completed,
        }
    }

    #[tokio::test]
    async fn append_assigns_id_and_timestamp() {
        let store = get_test_store();

        let transfer = store
            .append(transfer_between("a@luka.com", "b@luka.com", 200))
            .await
            .expect("Could not append transfer");

        assert!(transfer.id > 0);
        assert_eq!(transfer.amount, 200);
        assert_eq!(transfer.status, TransferStatus::Completed);
    }

    #[tokio::test]
    async fn get_returns_appended_record() {
        let store = get_test_store();
        let appended = store
            .append(transfer_between("a@luka.com", "b@luka.com", 200))
            .await
            .unwrap();

        let got = store.get(appended.id).await.unwrap();

        assert_eq!(got, appended);
    }

    #[tokio::test]
    async fn get_fails_for_unknown_id() {
        let store = get_test_store();

        let got = store.get(1337).await;

        assert_eq!(got, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn history_includes_both_directions_newest_first() {
        let store = get_test_store();
        let first = store
            .append(transfer_between("a@luka.com", "b@luka.com", 100))
            .await
            .unwrap();
        let second = store
            .append(transfer_between("b@luka.com", "a@luka.com", 50))
            .await
            .unwrap();
        let third = store
            .append(transfer_between("a@luka.com", "c@luka.com", 25))
            .await
            .unwrap();

        let history = store.history_for(&AccountRef::new("a@luka.com")).await.unwrap();

        assert_eq!(history, vec![third, second, first]);
    }

    #[tokio::test]
    async fn history_excludes_unrelated_accounts() {
        let store = get_test_store();
        store
            .append(transfer_between("a@luka.com", "b@luka.com", 100))
            .await
            .unwrap();

        let history = store.history_for(&AccountRef::new("c@luka.com")).await.unwrap();

        assert_eq!(history, vec![]);
    }
}
