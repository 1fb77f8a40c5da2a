//! Account management for the points program.
//!
//! This module contains the account model, the opaque [AccountRef] used to
//! address accounts across backends, and the account route handlers.

mod balance_endpoint;
mod core;
mod create_endpoint;
mod list_endpoint;

pub use balance_endpoint::{BalanceData, get_balance_endpoint, set_balance_endpoint};
pub use core::{Account, AccountId, AccountRef, NewAccount, Role, create_account_table, map_account_row};
pub use create_endpoint::{AccountData, create_account_endpoint};
pub use list_endpoint::list_accounts_endpoint;
