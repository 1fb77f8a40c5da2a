//! Implements a SQLite backed account store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::{
    Error,
    account::{Account, AccountRef, NewAccount, map_account_row},
    stores::AccountStore,
};

/// Register and retrieve accounts in the embedded database.
#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteAccountStore {
    /// Create a new store from the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

fn query_account(connection: &Connection, account: &AccountRef) -> Result<Account, Error> {
    let by_email = connection
        .prepare("SELECT id, email, name, role, balance FROM account WHERE email = :email")?
        .query_row(&[(":email", account.as_str())], map_account_row);

    match by_email {
        Ok(account) => Ok(account),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let Some(id) = account.as_id() else {
                return Err(Error::NotFound);
            };

            connection
                .prepare("SELECT id, email, name, role, balance FROM account WHERE id = :id")?
                .query_row(&[(":id", &id)], map_account_row)
                .map_err(|error| error.into())
        }
        Err(error) => Err(error.into()),
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn create(&self, new_account: NewAccount) -> Result<Account, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection
            .prepare(
                "INSERT INTO account (email, name, role, balance)
                 VALUES (?1, ?2, ?3, ?4)
                 RETURNING id, email, name, role, balance",
            )?
            .query_row(
                (
                    &new_account.email,
                    &new_account.name,
                    new_account.role.as_str(),
                    new_account.balance,
                ),
                map_account_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE,
                    },
                    _,
                ) => Error::DuplicateAccount(new_account.email.clone()),
                rusqlite::Error::SqliteFailure(
                    rusqlite::ffi::Error {
                        code: _,
                        extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_CHECK,
                    },
                    _,
                ) => Error::InvalidBalance(new_account.balance),
                error => error.into(),
            })
    }

    async fn get(&self, account: &AccountRef) -> Result<Account, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        query_account(&connection, account)
    }

    async fn list_by_balance(&self) -> Result<Vec<Account>, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        connection
            .prepare(
                "SELECT id, email, name, role, balance FROM account
                 ORDER BY balance DESC, id ASC",
            )?
            .query_map([], map_account_row)?
            .map(|maybe_account| maybe_account.map_err(|error| error.into()))
            .collect()
    }
}
