//! Transaction API endpoints

use api_types::transaction::{
    MonthlySummary, TransactionKind as ApiKind, TransactionList, TransactionNew,
    TransactionUpdate, TransactionView, TransactionsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, envelopes::month_or_current, server::ServerState};
use engine::{
    CreateTransactionCmd, Transaction, TransactionListFilter, UpdateTransactionCmd, users,
};

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn engine_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

fn map_transaction(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        kind: map_kind(tx.kind),
        amount_cents: tx.amount_cents,
        occurred_on: tx.occurred_on,
        description: tx.description,
        envelope_id: tx.envelope_id,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<TransactionList>,
) -> Result<Json<TransactionsResponse>, ServerError> {
    let filter = TransactionListFilter {
        from: payload.from,
        to: payload.to,
        kind: payload.kind.map(engine_kind),
        envelope_id: payload.envelope_id,
    };
    let transactions = state
        .engine
        .list_transactions(&user.username, &filter)
        .await?;

    Ok(Json(TransactionsResponse {
        transactions: transactions.into_iter().map(map_transaction).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = CreateTransactionCmd::new(
        user.username.clone(),
        engine_kind(payload.kind),
        payload.amount_cents,
        payload.occurred_on,
    );
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(envelope_id) = payload.envelope_id {
        cmd = cmd.envelope_id(envelope_id);
    }

    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let mut cmd = UpdateTransactionCmd::new(user.username.clone(), id);
    if let Some(kind) = payload.kind {
        cmd = cmd.kind(engine_kind(kind));
    }
    if let Some(amount_cents) = payload.amount_cents {
        cmd = cmd.amount_cents(amount_cents);
    }
    if let Some(occurred_on) = payload.occurred_on {
        cmd = cmd.occurred_on(occurred_on);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(envelope_id) = payload.envelope_id {
        cmd = cmd.envelope_id(envelope_id);
    }

    let tx = state.engine.update_transaction(cmd).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_transaction(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
pub struct SummaryQuery {
    month: Option<String>,
}

pub async fn summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<SummaryQuery>,
) -> Result<Json<MonthlySummary>, ServerError> {
    let month = month_or_current(payload.month.as_deref())?;
    let summary = state.engine.monthly_summary(&user.username, &month).await?;
    Ok(Json(MonthlySummary {
        month: month.as_str().to_string(),
        total_income_cents: summary.total_income_cents,
        total_expense_cents: summary.total_expense_cents,
        net_cents: summary.net_cents,
        income_count: summary.income_count,
        expense_count: summary.expense_count,
    }))
}
