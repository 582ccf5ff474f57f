//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};

use sea_orm::entity::{ActiveValue, prelude::*};

use crate::{Currency, EngineError, Money, ResultEngine};

/// A wallet.
///
/// A wallet holds money in a single currency. Its balance only changes
/// through transactions and never goes below zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    /// Identifier assigned by the database on insert.
    pub id: i64,
    pub owner: String,
    pub currency: Currency,
    pub balance: Money,
    pub last_updated: DateTime<Utc>,
}

impl Wallet {
    /// Returns the balance after applying `delta`, refusing overflow and
    /// negative results.
    pub fn balance_after(&self, delta: Money) -> ResultEngine<Money> {
        let balance = self
            .balance
            .checked_add(delta)
            .ok_or_else(|| EngineError::InvalidAmount("balance overflow".to_string()))?;
        if balance.is_negative() {
            return Err(EngineError::InsufficientFunds(format!(
                "wallet {} has {} {}, requested {}",
                self.id,
                self.balance.format(self.currency),
                self.currency,
                (-delta).format(self.currency)
            )));
        }
        Ok(balance)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub owner: String,
    pub currency: String,
    pub balance: i64,
    pub last_updated: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::NotSet,
            owner: ActiveValue::Set(value.owner.clone()),
            currency: ActiveValue::Set(value.currency.code().to_string()),
            balance: ActiveValue::Set(value.balance.minor()),
            last_updated: ActiveValue::Set(value.last_updated),
        }
    }
}

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner: model.owner,
            currency: Currency::try_from(model.currency.as_str())?,
            balance: Money::new(model.balance),
            last_updated: model.last_updated,
        })
    }
}
