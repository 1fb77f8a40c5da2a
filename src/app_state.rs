//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    db::initialize,
    stores::{
        AccountStore, BalanceStore, TransferStore,
        sqlite::{SqliteAccountStore, SqliteBalanceStore, SqliteTransferStore},
    },
    transfer::{ExecutionMode, TransferExecutor},
};

/// The state of the REST server.
///
/// Generic over the store backends so the same handlers serve the embedded
/// SQLite deployment and any other realization of the store traits.
#[derive(Debug, Clone)]
pub struct AppState<A, B, T>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    /// The store for registering and listing accounts.
    pub accounts: A,
    /// The store holding account point balances.
    pub balances: B,
    /// The append-only transfer record log.
    pub transfers: T,
    /// Applies validated transfers against the two stores above.
    pub executor: TransferExecutor<B, T>,
    /// The bearer token mutating requests must present, if any.
    pub api_token: Option<String>,
}

impl<A, B, T> AppState<A, B, T>
where
    A: AccountStore + Clone + Send + Sync,
    B: BalanceStore + Clone + Send + Sync,
    T: TransferStore + Clone + Send + Sync,
{
    /// Create a new [AppState] over the given stores.
    pub fn new(
        accounts: A,
        balances: B,
        transfers: T,
        mode: ExecutionMode,
        api_token: Option<String>,
    ) -> Self {
        let executor = TransferExecutor::with_mode(balances.clone(), transfers.clone(), mode);

        Self {
            accounts,
            balances,
            transfers,
            executor,
            api_token,
        }
    }
}

/// An alias for an [AppState] that uses SQLite for the backend.
pub type SqliteAppState = AppState<SqliteAccountStore, SqliteBalanceStore, SqliteTransferStore>;

/// Creates an [AppState] instance that uses SQLite for the backend.
///
/// This function will modify the database by adding the tables for the
/// domain models.
///
/// # Errors
/// Returns an error if the database cannot be initialized.
pub fn create_app_state(
    db_connection: Connection,
    mode: ExecutionMode,
    api_token: Option<String>,
) -> Result<SqliteAppState, rusqlite::Error> {
    initialize(&db_connection)?;

    let connection = Arc::new(Mutex::new(db_connection));
    let account_store = SqliteAccountStore::new(connection.clone());
    let balance_store = SqliteBalanceStore::new(connection.clone());
    let transfer_store = SqliteTransferStore::new(connection);

    Ok(AppState::new(
        account_store,
        balance_store,
        transfer_store,
        mode,
        api_token,
    ))
}
