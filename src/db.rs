//! Database initialization for the application's SQLite backend.

use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{account::create_account_table, transfer::create_transfer_table};

/// Add the tables for the domain models to the database.
///
/// The tables are created inside a single exclusive transaction so that a
/// half-initialized schema is never observable.
///
/// # Errors
/// Returns an error if a table could not be created or the transaction could
/// not be committed.
pub fn initialize(connection: &Connection) -> Result<(), rusqlite::Error> {
    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_account_table(&transaction)?;
    create_transfer_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
