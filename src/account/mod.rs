//! Accounts and the single write path for their cached balance.

mod core;
mod create_endpoint;
mod list_endpoint;

pub use self::core::{
    Account, AccountId, apply_balance_delta, create_account, create_account_table, get_account,
    list_accounts, map_account_row,
};
pub use create_endpoint::create_account_endpoint;
pub use list_endpoint::list_accounts_endpoint;
