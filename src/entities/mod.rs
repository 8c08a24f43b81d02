//! Sea-ORM entities of the bookkeeping schema.
//!
//! A user owns balances; every transaction is recorded against one balance.

pub mod balance;
pub mod transaction;

pub use transaction::TransactionType;
