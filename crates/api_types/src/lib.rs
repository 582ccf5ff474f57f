use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Jpy,
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub owner: String,
        pub currency: String,
    }

    /// A wallet as exposed over HTTP.
    ///
    /// The wallet's transactions are never part of this shape: they are
    /// listed through `GET /wallets/{id}/transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct WalletView {
        pub id: i64,
        pub owner: String,
        pub currency: Currency,
        /// Decimal string with the currency's minor digits (e.g. `"10.50"`).
        pub balance: String,
        pub last_updated: DateTime<Utc>,
    }
}

pub mod transaction {
    use super::*;

    /// `"C"` adds to the wallet balance, `"D"` subtracts from it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub enum TransactionType {
        #[serde(rename = "C")]
        Credit,
        #[serde(rename = "D")]
        Debit,
    }

    /// A transaction without its wallet.
    ///
    /// This is the shape of every item returned by
    /// `GET /wallets/{id}/transactions`.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: i64,
        pub global_id: String,
        pub currency: Currency,
        pub wallet_id: i64,
        pub transaction_type_id: TransactionType,
        /// Decimal string with the currency's minor digits (e.g. `"10.50"`).
        pub amount: String,
        pub description: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    /// Response of `POST /transactions`: the stored transaction together
    /// with its wallet after the balance change.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        #[serde(flatten)]
        pub transaction: TransactionView,
        pub wallet: super::wallet::WalletView,
    }
}
