//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionType as ApiTransactionType, TransactionView,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};
use engine::{Currency, Money, NewTransactionCmd, Transaction, TransactionType};

use crate::{
    ServerError,
    server::ServerState,
    validator::{self, Payload},
    wallets::{map_currency, wallet_view},
};

/// Keys a create request must carry. `description` is optional.
const REQUIRED_FIELDS: [&str; 5] = [
    "globalId",
    "currency",
    "walletId",
    "transactionTypeId",
    "amount",
];

fn map_type(transaction_type: TransactionType) -> ApiTransactionType {
    match transaction_type {
        TransactionType::Credit => ApiTransactionType::Credit,
        TransactionType::Debit => ApiTransactionType::Debit,
    }
}

pub(crate) fn transaction_view(tx: &Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        global_id: tx.global_id.clone(),
        currency: map_currency(tx.currency),
        wallet_id: tx.wallet_id,
        transaction_type_id: map_type(tx.transaction_type),
        amount: tx.amount.format(tx.currency),
        description: tx.description.clone(),
        created_at: tx.created_at,
    }
}

pub async fn list_for_wallet(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<TransactionView>>, ServerError> {
    let Path(wallet_id) = path.map_err(|err| ServerError::Validation(err.body_text()))?;
    tracing::debug!("listing transactions of wallet {wallet_id}");

    let transactions = state.engine.transactions_for_wallet(wallet_id).await?;

    Ok(Json(transactions.iter().map(transaction_view).collect()))
}

/// Creates a wallet transaction.
///
/// Example of a credit body:
/// `{"globalId":"123","currency":"EUR","walletId":"1","transactionTypeId":"C","amount":"100","description":"add money"}`
///
/// A debit uses `"transactionTypeId":"D"`.
pub async fn create(
    State(state): State<ServerState>,
    payload: Result<Json<Payload>, JsonRejection>,
) -> Result<Json<TransactionCreated>, ServerError> {
    tracing::debug!("creating wallet transaction");
    let Json(payload) = payload.map_err(|err| ServerError::Validation(err.body_text()))?;

    validator::validate(&payload, &REQUIRED_FIELDS)?;
    let cmd = new_transaction_cmd(&payload)?;

    let (transaction, wallet) = state.engine.create_transaction(cmd).await?;
    tracing::info!("transaction created with id={}", transaction.id);

    Ok(Json(TransactionCreated {
        transaction: transaction_view(&transaction),
        wallet: wallet_view(&wallet),
    }))
}

fn new_transaction_cmd(payload: &Payload) -> Result<NewTransactionCmd, ServerError> {
    let global_id = validator::required_text(payload, "globalId")?;
    let currency = Currency::try_from(validator::required_text(payload, "currency")?.as_str())?;

    let raw_wallet_id = validator::required_text(payload, "walletId")?;
    let wallet_id = raw_wallet_id.trim().parse::<i64>().map_err(|_| {
        ServerError::Validation(format!("walletId must be an integer, got {raw_wallet_id}"))
    })?;

    let transaction_type =
        TransactionType::try_from(validator::required_text(payload, "transactionTypeId")?.as_str())?;
    let amount = Money::parse(&validator::required_text(payload, "amount")?, currency)?;

    let cmd = NewTransactionCmd::new(global_id, wallet_id, currency, transaction_type, amount);
    Ok(match validator::text(payload, "description")? {
        Some(description) => cmd.description(description),
        None => cmd,
    })
}
