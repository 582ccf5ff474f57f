//! The wallet ledger engine.
//!
//! Holds wallets in a single currency and books credits and debits on them.
//! All state lives in the database; see [`Engine`] for the operations.

pub use commands::NewTransactionCmd;
pub use currency::Currency;
pub use error::EngineError;
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use transactions::{Transaction, TransactionType};
pub use wallets::Wallet;

mod commands;
mod currency;
mod error;
mod money;
mod ops;
mod transactions;
mod wallets;

type ResultEngine<T> = Result<T, EngineError>;
