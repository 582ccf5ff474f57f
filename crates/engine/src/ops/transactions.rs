use chrono::Utc;

use sea_orm::{
    DatabaseTransaction, QueryFilter, QueryOrder, SqlErr, TransactionTrait, prelude::*,
    sea_query::Expr,
};

use crate::{
    EngineError, NewTransactionCmd, ResultEngine, Transaction, Wallet, transactions, wallets,
};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Lists the transactions booked on a wallet, oldest first.
    ///
    /// Returns `KeyNotFound` if the wallet does not exist and an empty list
    /// if it exists but has no transactions.
    pub async fn transactions_for_wallet(&self, wallet_id: i64) -> ResultEngine<Vec<Transaction>> {
        with_tx!(self, |db_tx| {
            self.require_wallet(&db_tx, wallet_id).await?;

            transactions::Entity::find()
                .filter(transactions::Column::WalletId.eq(wallet_id))
                .order_by_asc(transactions::Column::CreatedAt)
                .order_by_asc(transactions::Column::Id)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Books a credit or a debit on a wallet.
    ///
    /// The insert and the balance change happen in the same DB transaction.
    /// Returns the stored transaction together with the wallet as it is
    /// after the change.
    ///
    /// Rejected with:
    /// - `Validation` if `global_id` is blank
    /// - `InvalidAmount` if `amount` is not positive or the balance would overflow
    /// - `KeyNotFound` if the wallet does not exist
    /// - `CurrencyMismatch` if `currency` differs from the wallet currency
    /// - `ExistingKey` if `global_id` was already used
    /// - `InsufficientFunds` if a debit is larger than the balance
    pub async fn create_transaction(
        &self,
        cmd: NewTransactionCmd,
    ) -> ResultEngine<(Transaction, Wallet)> {
        let global_id = normalize_required_text(&cmd.global_id, "global_id")?;
        if !cmd.amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        let description = normalize_optional_text(cmd.description.as_deref());

        with_tx!(self, |db_tx| {
            let wallet = Wallet::try_from(self.require_wallet(&db_tx, cmd.wallet_id).await?)?;
            if wallet.currency != cmd.currency {
                return Err(EngineError::CurrencyMismatch(format!(
                    "wallet currency is {}, got {}",
                    wallet.currency, cmd.currency
                )));
            }

            if self.global_id_exists(&db_tx, &global_id).await? {
                return Err(EngineError::ExistingKey(global_id));
            }

            let delta = cmd.transaction_type.signed(cmd.amount);
            wallet.balance_after(delta)?;
            let now = Utc::now();

            self.apply_wallet_delta(&db_tx, &wallet, delta.minor(), now)
                .await?;

            let tx = Transaction {
                id: 0,
                global_id,
                currency: cmd.currency,
                wallet_id: wallet.id,
                transaction_type: cmd.transaction_type,
                amount: cmd.amount,
                description,
                created_at: now,
            };
            let model = self.insert_transaction(&db_tx, &tx).await?;

            // Read back what the relative update stored.
            let wallet = Wallet::try_from(self.require_wallet(&db_tx, wallet.id).await?)?;
            Ok((Transaction::try_from(model)?, wallet))
        })
    }

    /// Inserts `tx`, reporting a `global_id` stored by a concurrent writer
    /// as `ExistingKey`.
    async fn insert_transaction(
        &self,
        db: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<transactions::Model> {
        match transactions::ActiveModel::from(tx).insert(db).await {
            Ok(model) => Ok(model),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    Err(EngineError::ExistingKey(tx.global_id.clone()))
                }
                _ => Err(err.into()),
            },
        }
    }

    async fn global_id_exists(&self, db: &DatabaseTransaction, global_id: &str) -> ResultEngine<bool> {
        transactions::Entity::find()
            .filter(transactions::Column::GlobalId.eq(global_id.to_string()))
            .one(db)
            .await
            .map(|model| model.is_some())
            .map_err(Into::into)
    }

    /// Adds `delta` to the stored balance.
    ///
    /// Debits only match rows whose balance still covers them, so a debit
    /// that raced with another one is reported as `InsufficientFunds`
    /// instead of leaving the balance negative.
    async fn apply_wallet_delta(
        &self,
        db: &DatabaseTransaction,
        wallet: &Wallet,
        delta: i64,
        now: chrono::DateTime<Utc>,
    ) -> ResultEngine<()> {
        let mut update = wallets::Entity::update_many()
            .col_expr(
                wallets::Column::Balance,
                Expr::col(wallets::Column::Balance).add(delta),
            )
            .col_expr(wallets::Column::LastUpdated, Expr::value(now))
            .filter(wallets::Column::Id.eq(wallet.id));
        if delta < 0 {
            update = update.filter(wallets::Column::Balance.gte(-delta));
        }

        let result = update.exec(db).await?;
        if result.rows_affected == 0 {
            return Err(EngineError::InsufficientFunds(format!(
                "wallet {} balance changed concurrently",
                wallet.id
            )));
        }
        Ok(())
    }
}
