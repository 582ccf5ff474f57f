//! Command structs for engine write operations.

use crate::{Currency, Money, TransactionType};

/// Book a credit or a debit on a wallet.
#[derive(Clone, Debug)]
pub struct NewTransactionCmd {
    /// Client-supplied idempotency key, unique across the ledger.
    pub global_id: String,
    pub currency: Currency,
    pub wallet_id: i64,
    pub transaction_type: TransactionType,
    /// Must be > 0. The type defines the sign of the balance change.
    pub amount: Money,
    pub description: Option<String>,
}

impl NewTransactionCmd {
    #[must_use]
    pub fn credit(
        global_id: impl Into<String>,
        wallet_id: i64,
        currency: Currency,
        amount: Money,
    ) -> Self {
        Self::new(global_id, wallet_id, currency, TransactionType::Credit, amount)
    }

    #[must_use]
    pub fn debit(
        global_id: impl Into<String>,
        wallet_id: i64,
        currency: Currency,
        amount: Money,
    ) -> Self {
        Self::new(global_id, wallet_id, currency, TransactionType::Debit, amount)
    }

    #[must_use]
    pub fn new(
        global_id: impl Into<String>,
        wallet_id: i64,
        currency: Currency,
        transaction_type: TransactionType,
        amount: Money,
    ) -> Self {
        Self {
            global_id: global_id.into(),
            currency,
            wallet_id,
            transaction_type,
            amount,
            description: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
