use chrono::Utc;

use sea_orm::{DatabaseTransaction, QueryOrder, TransactionTrait, prelude::*};

use crate::{Currency, EngineError, Money, ResultEngine, Wallet, wallets};

use super::{Engine, normalize_required_text, with_tx};

impl Engine {
    /// Return a wallet snapshot from DB.
    pub async fn wallet(&self, wallet_id: i64) -> ResultEngine<Wallet> {
        with_tx!(self, |db_tx| {
            let model = self.require_wallet(&db_tx, wallet_id).await?;
            Wallet::try_from(model)
        })
    }

    /// Return every wallet, oldest first.
    pub async fn wallets(&self) -> ResultEngine<Vec<Wallet>> {
        wallets::Entity::find()
            .order_by_asc(wallets::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Wallet::try_from)
            .collect()
    }

    /// Open a new wallet with a zero balance.
    pub async fn new_wallet(&self, owner: &str, currency: Currency) -> ResultEngine<Wallet> {
        let owner = normalize_required_text(owner, "owner")?;
        let wallet = Wallet {
            id: 0,
            owner,
            currency,
            balance: Money::ZERO,
            last_updated: Utc::now(),
        };

        let model = wallets::ActiveModel::from(&wallet)
            .insert(&self.database)
            .await?;
        Wallet::try_from(model)
    }

    pub(super) async fn require_wallet(
        &self,
        db: &DatabaseTransaction,
        wallet_id: i64,
    ) -> ResultEngine<wallets::Model> {
        wallets::Entity::find_by_id(wallet_id)
            .one(db)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(format!("wallet {wallet_id}")))
    }
}
