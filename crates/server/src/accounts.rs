//! Account API endpoints

use api_types::account::{AccountNew, AccountUpdate, AccountView, AccountsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Account, users};

fn map_account(account: Account) -> AccountView {
    AccountView {
        id: account.id,
        name: account.name,
        kind: account.kind,
        balance_cents: account.balance_cents,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AccountsResponse>, ServerError> {
    let accounts = state.engine.list_accounts(&user.username).await?;
    let total_balance_cents = state.engine.total_account_balance(&user.username).await?;
    Ok(Json(AccountsResponse {
        accounts: accounts.into_iter().map(map_account).collect(),
        total_balance_cents,
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let account = state
        .engine
        .create_account(
            &user.username,
            &payload.name,
            &payload.kind,
            payload.initial_cents.unwrap_or(0),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(map_account(account))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<AccountUpdate>,
) -> Result<Json<AccountView>, ServerError> {
    let account = state
        .engine
        .update_account(
            &user.username,
            id,
            payload.name.as_deref(),
            payload.kind.as_deref(),
        )
        .await?;
    Ok(Json(map_account(account)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_account(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
