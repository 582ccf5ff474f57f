//! Wallets API endpoints.

use api_types::wallet::{WalletNew, WalletView};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use engine::{Currency, Wallet};

use crate::{ServerError, server::ServerState};

pub(crate) fn map_currency(currency: Currency) -> api_types::Currency {
    match currency {
        Currency::Eur => api_types::Currency::Eur,
        Currency::Usd => api_types::Currency::Usd,
        Currency::Gbp => api_types::Currency::Gbp,
        Currency::Jpy => api_types::Currency::Jpy,
    }
}

pub(crate) fn wallet_view(wallet: &Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        owner: wallet.owner.clone(),
        currency: map_currency(wallet.currency),
        balance: wallet.balance.format(wallet.currency),
        last_updated: wallet.last_updated,
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<WalletView>>, ServerError> {
    let wallets = state.engine.wallets().await?;
    Ok(Json(wallets.iter().map(wallet_view).collect()))
}

pub async fn get(
    State(state): State<ServerState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<WalletView>, ServerError> {
    let Path(wallet_id) = path.map_err(|err| ServerError::Validation(err.body_text()))?;
    let wallet = state.engine.wallet(wallet_id).await?;
    Ok(Json(wallet_view(&wallet)))
}

pub async fn wallet_new(
    State(state): State<ServerState>,
    payload: Result<Json<WalletNew>, JsonRejection>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let Json(payload) = payload.map_err(|err| ServerError::Validation(err.body_text()))?;
    let currency = Currency::try_from(payload.currency.as_str())?;

    let wallet = state.engine.new_wallet(&payload.owner, currency).await?;
    tracing::info!("wallet created with id={} for {}", wallet.id, wallet.owner);

    Ok((StatusCode::CREATED, Json(wallet_view(&wallet))))
}
