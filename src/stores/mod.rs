//! Contains traits and implementations for objects that store accounts,
//! balances, and transfer records.
//!
//! The balance and transfer traits have an embedded SQLite realization in
//! [sqlite] and a remote REST realization in [api]; accounts are managed by
//! the embedded backend only. Callers are written against the traits and
//! must not depend on which backend is active.

use async_trait::async_trait;

use crate::{
    Error,
    account::{Account, AccountRef, NewAccount},
    transfer::{NewTransfer, Transfer, TransferId},
};

pub mod api;
pub mod sqlite;

/// Handles the registration and retrieval of accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Register a new account.
    ///
    /// # Errors
    /// Returns [Error::DuplicateAccount] if the email is already registered.
    async fn create(&self, new_account: NewAccount) -> Result<Account, Error>;

    /// Retrieve the account matching `account`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no account matches.
    async fn get(&self, account: &AccountRef) -> Result<Account, Error>;

    /// Retrieve all accounts ordered by balance, highest first.
    async fn list_by_balance(&self) -> Result<Vec<Account>, Error>;
}

/// Holds each account's current point balance.
///
/// There is no optimistic-concurrency token on [set_balance](Self::set_balance):
/// two concurrent writers race, last write wins. The transfer executor's
/// serialized mode exists to keep that window closed for transfers.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    /// The current balance of `account`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no account matches.
    async fn balance_of(&self, account: &AccountRef) -> Result<i64, Error>;

    /// Overwrite the stored balance of `account` with `new_balance`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no account matches.
    async fn set_balance(&self, account: &AccountRef, new_balance: i64) -> Result<(), Error>;

    /// Whether an account matching `account` exists.
    async fn account_exists(&self, account: &AccountRef) -> Result<bool, Error>;
}

/// Append-only log of transfer records.
#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Append a transfer record, stamping the record timestamp.
    async fn append(&self, new_transfer: NewTransfer) -> Result<Transfer, Error>;

    /// Retrieve a transfer record by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if no record matches.
    async fn get(&self, id: TransferId) -> Result<Transfer, Error>;

    /// Retrieve every transfer where `account` is the source or the
    /// destination, newest first.
    ///
    /// Implementers must sort explicitly rather than relying on insertion
    /// order.
    async fn history_for(&self, account: &AccountRef) -> Result<Vec<Transfer>, Error>;
}
