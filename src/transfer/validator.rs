//! Precondition checks that every transfer passes before any balance is
//! touched.

use crate::{Error, account::AccountRef, stores::BalanceStore};

/// A transfer that has passed validation and may be executed.
///
/// The fields are private so an intent can only be obtained through
/// [validate_transfer] or [prepare_transfer].
#[derive(Debug, Clone, PartialEq)]
pub struct TransferIntent {
    source: AccountRef,
    destination: AccountRef,
    amount: i64,
}

impl TransferIntent {
    /// The account the points will be taken from.
    pub fn source(&self) -> &AccountRef {
        &self.source
    }

    /// The account the points will be given to.
    pub fn destination(&self) -> &AccountRef {
        &self.destination
    }

    /// The number of points to move.
    pub fn amount(&self) -> i64 {
        self.amount
    }
}

/// Check the preconditions for a transfer without touching any store.
///
/// `source_balance` and `destination_exists` must come from a fresh read
/// taken immediately before the call. The checks run in a fixed order and
/// stop at the first failure:
///
/// 1. `amount` must be positive, else [Error::InvalidAmount].
/// 2. `source` and `destination` must differ, else [Error::SelfTransfer].
/// 3. The destination must exist, else [Error::RecipientNotFound].
/// 4. `amount` must not exceed `source_balance`, else
///    [Error::InsufficientFunds].
pub fn validate_transfer(
    source: &AccountRef,
    destination: &AccountRef,
    amount: i64,
    source_balance: i64,
    destination_exists: bool,
) -> Result<TransferIntent, Error> {
    if amount <= 0 {
        return Err(Error::InvalidAmount(amount));
    }

    if source == destination {
        return Err(Error::SelfTransfer);
    }

    if !destination_exists {
        return Err(Error::RecipientNotFound(destination.clone()));
    }

    if amount > source_balance {
        return Err(Error::InsufficientFunds {
            requested: amount,
            available: source_balance,
        });
    }

    Ok(TransferIntent {
        source: source.clone(),
        destination: destination.clone(),
        amount,
    })
}

/// Read the source balance and recipient existence from `balances` and
/// validate a transfer against them.
///
/// Both the manual-entry path and the QR path build their intent through
/// this function, so the two converge on identical validation.
///
/// # Errors
/// Returns [Error::NotFound] if the source account is unknown, any
/// validation error from [validate_transfer], or a store error from the
/// reads.
pub async fn prepare_transfer<B: BalanceStore>(
    balances: &B,
    source: &AccountRef,
    destination: &AccountRef,
    amount: i64,
) -> Result<TransferIntent, Error> {
    let source_balance = balances.balance_of(source).await?;
    let destination_exists = balances.account_exists(destination).await?;

    validate_transfer(source, destination, amount, source_balance, destination_exists)
}


#[cfg(test)]
mod prepare_transfer_tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        account::AccountRef,
        db::initialize,
        stores::sqlite::SqliteBalanceStore,
    };

    use super::prepare_transfer;

    fn get_test_store() -> SqliteBalanceStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        for (email, balance) in [("a@luka.com", 500), ("b@luka.com", 100)] {
            connection
                .execute(
                    "INSERT INTO account (email, name, role, balance) VALUES (?1, ?2, ?3, ?4)",
                    (email, "Test", "student", balance),
                )
                .unwrap();
        }

        SqliteBalanceStore::new(Arc::new(Mutex::new(connection)))
    }

    #[tokio::test]
    async fn reads_fresh_balance_and_existence() {
        let store = get_test_store();

        let intent = prepare_transfer(
            &store,
            &AccountRef::new("a@luka.com"),
            &AccountRef::new("b@luka.com"),
            200,
        )
        .await
        .expect("Transfer should pass validation");

        assert_eq!(intent.amount(), 200);
    }

    #[tokio::test]
    async fn fails_when_source_is_unknown() {
        let store = get_test_store();

        let got = prepare_transfer(
            &store,
            &AccountRef::new("ghost@luka.com"),
            &AccountRef::new("b@luka.com"),
            200,
        )
        .await;

        assert_eq!(got, Err(Error::NotFound));
    }

    #[tokio::test]
    async fn fails_when_recipient_is_unknown() {
        let store = get_test_store();

        let got = prepare_transfer(
            &store,
            &AccountRef::new("a@luka.com"),
            &AccountRef::new("ghost@luka.com"),
            200,
        )
        .await;

        assert_eq!(
            got,
            Err(Error::RecipientNotFound(AccountRef::new("ghost@luka.com")))
        );
    }
}
