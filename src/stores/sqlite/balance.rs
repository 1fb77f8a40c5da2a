//! Implements a SQLite backed balance store.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::Connection;

use crate::{Error, account::AccountRef, stores::BalanceStore};

/// Read and overwrite account point balances in the embedded database.
///
/// A reference is resolved as an email first and as a numeric row id second,
/// so callers holding either shape of identifier reach the same account.
#[derive(Debug, Clone)]
pub struct SqliteBalanceStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteBalanceStore {
    /// Create a new store from the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// Fetch the balance of the account matching `account`, by email first,
/// then by numeric id.
fn query_balance(connection: &Connection, account: &AccountRef) -> Result<i64, Error> {
    let by_email = connection
        .prepare("SELECT balance FROM account WHERE email = :email")?
        .query_row(&[(":email", account.as_str())], |row| row.get(0));

    match by_email {
        Ok(balance) => Ok(balance),
        Err(rusqlite::Error::QueryReturnedNoRows) => {
            let Some(id) = account.as_id() else {
                return Err(Error::NotFound);
            };

            connection
                .prepare("SELECT balance FROM account WHERE id = :id")?
                .query_row(&[(":id", &id)], |row| row.get(0))
                .map_err(|error| error.into())
        }
        Err(error) => Err(error.into()),
    }
}

#[async_trait]
impl BalanceStore for SqliteBalanceStore {
    async fn balance_of(&self, account: &AccountRef) -> Result<i64, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        query_balance(&connection, account)
    }

    async fn set_balance(&self, account: &AccountRef, new_balance: i64) -> Result<(), Error> {
        if new_balance < 0 {
            return Err(Error::InvalidBalance(new_balance));
        }

        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        let updated = connection.execute(
            "UPDATE account SET balance = :balance WHERE email = :email",
            rusqlite::named_params! { ":balance": new_balance, ":email": account.as_str() },
        )?;

        if updated > 0 {
            return Ok(());
        }

        let Some(id) = account.as_id() else {
            return Err(Error::NotFound);
        };

        let updated = connection.execute(
            "UPDATE account SET balance = :balance WHERE id = :id",
            rusqlite::named_params! { ":balance": new_balance, ":id": id },
        )?;

        if updated == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    async fn account_exists(&self, account: &AccountRef) -> Result<bool, Error> {
        let connection = self.connection.lock().map_err(|_| Error::DatabaseLock)?;

        match query_balance(&connection, account) {
            Ok(_) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod sqlite_balance_store_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{Error, account::AccountRef, db::initialize, stores::BalanceStore};

    use super::SqliteBalanceStore;

    fn get_test_store() -> SqliteBalanceStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        connection
            .execute(
                "INSERT INTO account (email, name, role, balance) VALUES (?1, ?2, ?3, ?4)",
                ("estudiante1@luka.com", "Estudiante 1", "student", 897),
            )
            .unwrap();

        SqliteBalanceStore::new(Arc::new(Mutex::new(connection)))
    }

    #[tokio::test]
    async fn balance_of_resolves_email_reference() {
        let store = get_test_store();

        let got = store
            .balance_of(&AccountRef::new("estudiante1@luka.com"))
            .await;

        assert_eq!(got, Ok(897));
    }

    #[tokio::test]
    async fn balance_of_resolves_numeric_reference() {
        let store = get_test_store();

        let got = store.balance_of(&AccountRef::new("1")).await;

        assert_eq!(got, Ok(897));
    }

    #[tokio::test]
    async fn balance_of_fails_for_unknown_account() {
        let store = get_test_store();

        let got = store.balance_of(&AccountRef::new("ghost@luka.com")).await;

        assert_eq!(got, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn set_balance_overwrites() {
        let store = get_test_store();
        let account = AccountRef::new("estudiante1@luka.com");

        store.set_balance(&account, 1250).await.unwrap();

        assert_eq!(store.balance_of(&account).await, Ok(1250));
    }

    #[tokio::test]
    async fn set_balance_rejects_negative_values() {
        let store = get_test_store();
        let account = AccountRef::new("estudiante1@luka.com");

        let got = store.set_balance(&account, -10).await;

        assert_eq!(got, Err(Error::InvalidBalance(-10)));
        assert_eq!(store.balance_of(&account).await, Ok(897));
    }

    #[tokio::test]
    async fn set_balance_fails_for_unknown_account() {
        let store = get_test_store();

        let got = store.set_balance(&AccountRef::new("ghost@luka.com"), 5).await;

        assert_eq!(got, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn account_exists_distinguishes_known_and_unknown() {
        let store = get_test_store();

        assert_eq!(
            store
                .account_exists(&AccountRef::new("estudiante1@luka.com"))
                .await,
            Ok(true)
        );
        assert_eq!(
            store.account_exists(&AccountRef::new("ghost@luka.com")).await,
            Ok(false)
        );
    }
}
