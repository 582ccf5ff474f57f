//! Transaction primitives.
//!
//! A `Transaction` is a credit or a debit booked on exactly one wallet. Its
//! `global_id` is supplied by the client and identifies the transaction
//! across the whole ledger.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::{Currency, EngineError, Money};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn code(self) -> &'static str {
        match self {
            Self::Credit => "C",
            Self::Debit => "D",
        }
    }

    /// The balance change produced by booking `amount` with this type.
    pub fn signed(self, amount: Money) -> Money {
        match self {
            Self::Credit => amount,
            Self::Debit => -amount,
        }
    }
}

impl TryFrom<&str> for TransactionType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "C" => Ok(Self::Credit),
            "D" => Ok(Self::Debit),
            other => Err(EngineError::Validation(format!(
                "invalid transaction type: {other} (expected C or D)"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub global_id: String,
    pub currency: Currency,
    pub wallet_id: i64,
    pub transaction_type: TransactionType,
    /// Always positive; the sign comes from `transaction_type`.
    pub amount: Money,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub global_id: String,
    pub currency: String,
    pub wallet_id: i64,
    pub transaction_type: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Wallets,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::NotSet,
            global_id: ActiveValue::Set(tx.global_id.clone()),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id),
            transaction_type: ActiveValue::Set(tx.transaction_type.code().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.minor()),
            description: ActiveValue::Set(tx.description.clone()),
            created_at: ActiveValue::Set(tx.created_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            global_id: model.global_id,
            currency: Currency::try_from(model.currency.as_str())?,
            wallet_id: model.wallet_id,
            transaction_type: TransactionType::try_from(model.transaction_type.as_str())?,
            amount: Money::new(model.amount_minor),
            description: model.description,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes_parse_case_insensitively() {
        assert_eq!(TransactionType::try_from("C").unwrap(), TransactionType::Credit);
        assert_eq!(TransactionType::try_from(" d ").unwrap(), TransactionType::Debit);
        assert!(TransactionType::try_from("X").is_err());
        assert!(TransactionType::try_from("").is_err());
    }

    #[test]
    fn debit_is_negative() {
        let amount = Money::new(500);
        assert_eq!(TransactionType::Credit.signed(amount), Money::new(500));
        assert_eq!(TransactionType::Debit.signed(amount), Money::new(-500));
    }
}
