//! Defines the core data models and database queries for accounts.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

/// Alias for the integer type used for account row IDs.
pub type AccountId = i64;

/// An opaque reference naming a balance-holding account.
///
/// Depending on the active backend an account is addressed by its email or
/// by its numeric id. Callers treat the reference as an opaque string and
/// leave the interpretation to the store, so code written against one
/// backend keeps working against the other.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountRef(String);

impl AccountRef {
    /// Create an account reference from a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// View the reference as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The reference interpreted as a numeric account id, if it is one.
    pub fn as_id(&self) -> Option<AccountId> {
        self.0.parse().ok()
    }
}

impl Display for AccountRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<AccountId> for AccountRef {
    fn from(id: AccountId) -> Self {
        Self(id.to_string())
    }
}

/// The role an account holds in the points program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Program administrators.
    Admin,
    /// Companies funding campaigns with points.
    Company,
    /// Students earning and spending points.
    Student,
}

impl Role {
    /// The canonical text form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Company => "company",
            Role::Student => "student",
        }
    }

    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "admin" => Some(Role::Admin),
            "company" => Some(Role::Company),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// A balance-holding participant of the points program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// The account's row ID in the application database.
    pub id: AccountId,
    /// The email address the account is registered under.
    pub email: String,
    /// The display name of the account holder.
    pub name: String,
    /// The account's role.
    pub role: Role,
    /// The current point balance. Never negative.
    pub balance: i64,
}

/// The data needed to register a new account.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAccount {
    /// The email address to register the account under. Must be unique.
    pub email: String,
    /// The display name of the account holder.
    pub name: String,
    /// The account's role.
    pub role: Role,
    /// The starting point balance.
    pub balance: i64,
}

/// Create the account table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS account (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            balance INTEGER NOT NULL CHECK (balance >= 0)
        )",
        (),
    )?;

    Ok(())
}

/// Convert an account row into an [Account].
///
/// Expects the columns `id, email, name, role, balance` in that order.
pub fn map_account_row(row: &Row) -> Result<Account, rusqlite::Error> {
    let id = row.get(0)?;
    let email = row.get(1)?;
    let name = row.get(2)?;
    let raw_role: String = row.get(3)?;
    let balance = row.get(4)?;

    let role = Role::parse(&raw_role).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            rusqlite::types::Type::Text,
            format!("unknown account role \"{raw_role}\"").into(),
        )
    })?;

    Ok(Account {
        id,
        email,
        name,
        role,
        balance,
    })
}
