//! Defines the core data models and database schema for transfers.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::account::AccountRef;

/// Alias for the integer type used for transfer row IDs.
pub type TransferId = i64;

/// The lifecycle state of a transfer record.
///
/// Transfers are only recorded once both balance writes succeeded, so
/// `Completed` is the only status ever produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    /// Both the debit and the credit were applied and the record written.
    Completed,
}

impl TransferStatus {
    /// The canonical text form stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferStatus::Completed => "completed",
        }
    }
}

/// A single point movement from one account to another, recorded immutably.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// The ID of the transfer record.
    pub id: TransferId,
    /// The account the points were taken from.
    pub source: AccountRef,
    /// The account the points were given to.
    pub destination: AccountRef,
    /// The number of points moved.
    pub amount: i64,
    /// When the transfer was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The state of the transfer.
    pub status: TransferStatus,
}

/// The data needed to record a new transfer.
///
/// The record timestamp is stamped by the store on append.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransfer {
    /// The account the points were taken from.
    pub source: AccountRef,
    /// The account the points were given to.
    pub destination: AccountRef,
    /// The number of points moved.
    pub amount: i64,
    /// The state of the transfer.
    pub status: TransferStatus,
}

/// Create the transfer table.
///
/// Source and destination are stored as opaque references without foreign
/// keys; the record log outlives account rows on purpose.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_transfer_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS transfer (
            id INTEGER PRIMARY KEY,
            source TEXT NOT NULL,
            destination TEXT NOT NULL,
            amount INTEGER NOT NULL,
            status TEXT NOT NULL,
            created_at TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Convert a transfer row into a [Transfer].
///
/// Expects the columns `id, source, destination, amount, status, created_at`
/// in that order.
pub fn map_transfer_row(row: &Row) -> Result<Transfer, rusqlite::Error> {
    let id = row.get(0)?;
    let source: String = row.get(1)?;
    let destination: String = row.get(2)?;
    let amount = row.get(3)?;
    let raw_status: String = row.get(4)?;
    let created_at = row.get(5)?;

    let status = match raw_status.as_str() {
        "completed" => TransferStatus::Completed,
        other => {
            return Err(rusqlite::Error::FromSqlConversionFailure(
                4,
                rusqlite::types::Type::Text,
                format!("unknown transfer status \"{other}\"").into(),
            ));
        }
    };

    Ok(Transfer {
        id,
        source: AccountRef::new(source),
        destination: AccountRef::new(destination),
        amount,
        created_at,
        status,
    })
}
