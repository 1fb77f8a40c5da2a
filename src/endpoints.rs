//! The API endpoint URIs.
//!
//! For endpoints that take an account or transfer parameter, use the
//! matching helper function to build a concrete path.

use crate::{account::AccountRef, transfer::TransferId};

/// The route to register and list accounts.
pub const ACCOUNTS: &str = "/api/accounts";
/// The route to read and overwrite a single account's balance.
pub const ACCOUNT_BALANCE: &str = "/api/accounts/{account}/balance";
/// The route to read a single account's transfer history.
pub const ACCOUNT_TRANSFERS: &str = "/api/accounts/{account}/transfers";
/// The route to render a payment request QR image for an account.
pub const ACCOUNT_PAYMENT_REQUEST: &str = "/api/accounts/{account}/payment-request";
/// The route to create transfers.
pub const TRANSFERS: &str = "/api/transfers";
/// The route to read a single transfer.
pub const TRANSFER: &str = "/api/transfers/{transfer}";
/// The route used by remote store adapters to append a raw transfer record.
pub const TRANSFER_RECORDS: &str = "/api/transfer-records";

/// The balance path for `account`.
pub fn account_balance(account: &AccountRef) -> String {
    ACCOUNT_BALANCE.replace("{account}", account.as_str())
}

/// The transfer history path for `account`.
pub fn account_transfers(account: &AccountRef) -> String {
    ACCOUNT_TRANSFERS.replace("{account}", account.as_str())
}

/// The payment request path for `account`.
pub fn account_payment_request(account: &AccountRef) -> String {
    ACCOUNT_PAYMENT_REQUEST.replace("{account}", account.as_str())
}

/// The path for the transfer with `id`.
pub fn transfer(id: TransferId) -> String {
    TRANSFER.replace("{transfer}", &id.to_string())
}
