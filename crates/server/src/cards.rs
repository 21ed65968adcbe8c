//! Card and invoice API endpoints

use api_types::card::{
    CardActiveUpdate, CardNew, CardView, CardsResponse, InvoiceCharge, InvoicePay,
    InvoiceStatus as ApiStatus, InvoiceView, InvoicesResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{Card, Invoice, InvoiceStatus, NewCardCmd, PayInvoiceCmd, users};

fn map_card(card: Card) -> CardView {
    CardView {
        id: card.id,
        name: card.name,
        brand: card.brand,
        limit_cents: card.limit_cents,
        available_limit_cents: card.available_limit_cents,
        closing_day: card.closing_day,
        due_day: card.due_day,
        active: card.active,
    }
}

fn map_invoice(invoice: Invoice) -> InvoiceView {
    InvoiceView {
        id: invoice.id,
        card_id: invoice.card_id,
        month: invoice.month.as_str().to_string(),
        total_cents: invoice.total_cents,
        status: match invoice.status {
            InvoiceStatus::Open => ApiStatus::Open,
            InvoiceStatus::Closed => ApiStatus::Closed,
            InvoiceStatus::Paid => ApiStatus::Paid,
        },
        closes_on: invoice.closes_on,
        due_on: invoice.due_on,
        paid_on: invoice.paid_on,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CardsResponse>, ServerError> {
    let cards = state.engine.list_cards(&user.username).await?;
    Ok(Json(CardsResponse {
        cards: cards.into_iter().map(map_card).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<CardNew>,
) -> Result<(StatusCode, Json<CardView>), ServerError> {
    let card = state
        .engine
        .create_card(NewCardCmd {
            user_id: user.username.clone(),
            name: payload.name,
            brand: payload.brand,
            limit_cents: payload.limit_cents,
            closing_day: payload.closing_day,
            due_day: payload.due_day,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_card(card))))
}

pub async fn set_active(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CardActiveUpdate>,
) -> Result<Json<CardView>, ServerError> {
    let card = state
        .engine
        .set_card_active(&user.username, id, payload.active)
        .await?;
    Ok(Json(map_card(card)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_card(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_invoices(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoicesResponse>, ServerError> {
    let invoices = state.engine.list_invoices(&user.username, id).await?;
    Ok(Json(InvoicesResponse {
        invoices: invoices.into_iter().map(map_invoice).collect(),
    }))
}

pub async fn current_invoice(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<InvoiceView>, ServerError> {
    let today = Utc::now().date_naive();
    let invoice = state
        .engine
        .current_invoice(&user.username, id, today)
        .await?;
    Ok(Json(map_invoice(invoice)))
}

pub async fn charge_invoice(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path((card_id, invoice_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<InvoiceCharge>,
) -> Result<Json<InvoiceView>, ServerError> {
    let invoice = state
        .engine
        .charge_invoice(&user.username, card_id, invoice_id, payload.amount_cents)
        .await?;
    Ok(Json(map_invoice(invoice)))
}

pub async fn pay_invoice(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path((card_id, invoice_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<InvoicePay>,
) -> Result<Json<InvoiceView>, ServerError> {
    let invoice = state
        .engine
        .pay_invoice(PayInvoiceCmd {
            user_id: user.username.clone(),
            card_id,
            invoice_id,
            account_id: payload.account_id,
            amount_cents: payload.amount_cents,
            paid_on: payload.paid_on.unwrap_or_else(|| Utc::now().date_naive()),
        })
        .await?;
    Ok(Json(map_invoice(invoice)))
}
