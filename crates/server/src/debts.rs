//! Debt API endpoints

use api_types::debt::{
    Amortize, AmortizationView, AmortizationsResponse, DebtNew, DebtStatus as ApiStatus,
    DebtStatusUpdate, DebtSummary, DebtView, DebtsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{AmortizeDebtCmd, Debt, DebtStatus, NewDebtCmd, users};

fn map_status(status: DebtStatus) -> ApiStatus {
    match status {
        DebtStatus::Pending => ApiStatus::Pending,
        DebtStatus::Negotiating => ApiStatus::Negotiating,
        DebtStatus::Settled => ApiStatus::Settled,
    }
}

fn engine_status(status: ApiStatus) -> DebtStatus {
    match status {
        ApiStatus::Pending => DebtStatus::Pending,
        ApiStatus::Negotiating => DebtStatus::Negotiating,
        ApiStatus::Settled => DebtStatus::Settled,
    }
}

fn map_debt(debt: Debt) -> DebtView {
    let paid_percent = debt.paid_percent();
    DebtView {
        id: debt.id,
        description: debt.description,
        original_cents: debt.original_cents,
        current_cents: debt.current_cents,
        monthly_interest_bps: debt.monthly_interest_bps,
        status: map_status(debt.status),
        started_on: debt.started_on,
        settled_on: debt.settled_on,
        envelope_id: debt.envelope_id,
        paid_percent,
    }
}

#[derive(Deserialize)]
pub struct DebtListQuery {
    status: Option<ApiStatus>,
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<DebtListQuery>,
) -> Result<Json<DebtsResponse>, ServerError> {
    let debts = state
        .engine
        .list_debts(&user.username, payload.status.map(engine_status))
        .await?;
    Ok(Json(DebtsResponse {
        debts: debts.into_iter().map(map_debt).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<(StatusCode, Json<DebtView>), ServerError> {
    let debt = state
        .engine
        .create_debt(NewDebtCmd {
            user_id: user.username.clone(),
            description: payload.description,
            original_cents: payload.original_cents,
            monthly_interest_bps: payload.monthly_interest_bps.unwrap_or(0),
            started_on: payload.started_on,
            envelope_id: payload.envelope_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_debt(debt))))
}

pub async fn amortize(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Amortize>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state
        .engine
        .amortize_debt(AmortizeDebtCmd {
            user_id: user.username.clone(),
            debt_id: id,
            envelope_id: payload.envelope_id,
            amount_cents: payload.amount_cents,
            paid_on: payload.paid_on,
            note: payload.note,
        })
        .await?;
    Ok(Json(map_debt(debt)))
}

pub async fn update_status(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DebtStatusUpdate>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state
        .engine
        .update_debt_status(&user.username, id, engine_status(payload.status))
        .await?;
    Ok(Json(map_debt(debt)))
}

pub async fn list_amortizations(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AmortizationsResponse>, ServerError> {
    let amortizations = state.engine.list_amortizations(&user.username, id).await?;
    Ok(Json(AmortizationsResponse {
        amortizations: amortizations
            .into_iter()
            .map(|a| AmortizationView {
                id: a.id,
                envelope_id: a.envelope_id,
                amount_cents: a.amount_cents,
                paid_on: a.paid_on,
                note: a.note,
            })
            .collect(),
    }))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_debt(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DebtSummary>, ServerError> {
    let summary = state.engine.debt_summary(&user.username).await?;
    Ok(Json(DebtSummary {
        total: summary.total,
        pending: summary.pending,
        negotiating: summary.negotiating,
        settled: summary.settled,
        total_owed_cents: summary.total_owed_cents,
        total_original_cents: summary.total_original_cents,
    }))
}
