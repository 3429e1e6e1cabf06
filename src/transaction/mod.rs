//! Transactions and the balance-consistency core.
//!
//! The ledger submodule computes signed balance deltas; the core submodule
//! owns the atomic create/update/delete operations that apply them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod ledger;
mod list_endpoint;
mod update_endpoint;

pub use self::core::{
    NewTransaction, Transaction, TransactionChanges, TransactionDetails, TransactionId,
    create_transaction, create_transaction_table, delete_transaction, get_transaction,
    get_transaction_details, list_transactions, map_transaction_row, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use ledger::{TransactionType, reversal_delta, signed_delta};
pub use list_endpoint::{get_transaction_endpoint, list_transactions_endpoint};
pub use update_endpoint::update_transaction_endpoint;
