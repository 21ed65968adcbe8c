//! Recurring item API endpoints

use api_types::recurring::{
    Frequency as ApiFrequency, RecurringItemNew, RecurringItemUpdate, RecurringItemView,
    RecurringResponse,
};
use api_types::transaction::TransactionKind as ApiKind;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{
    Frequency, NewRecurringItemCmd, RecurringItem, TransactionKind, UpdateRecurringItemCmd, users,
};

fn map_item(item: RecurringItem) -> RecurringItemView {
    RecurringItemView {
        id: item.id,
        kind: match item.kind {
            TransactionKind::Income => ApiKind::Income,
            TransactionKind::Expense => ApiKind::Expense,
        },
        amount_cents: item.amount_cents,
        description: item.description,
        due_day: item.due_day,
        frequency: match item.frequency {
            Frequency::Monthly => ApiFrequency::Monthly,
            Frequency::Yearly => ApiFrequency::Yearly,
        },
        active: item.active,
        envelope_id: item.envelope_id,
    }
}

fn engine_frequency(frequency: ApiFrequency) -> Frequency {
    match frequency {
        ApiFrequency::Monthly => Frequency::Monthly,
        ApiFrequency::Yearly => Frequency::Yearly,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<RecurringResponse>, ServerError> {
    let items = state.engine.list_recurring_items(&user.username).await?;
    Ok(Json(RecurringResponse {
        items: items.into_iter().map(map_item).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<RecurringItemNew>,
) -> Result<(StatusCode, Json<RecurringItemView>), ServerError> {
    let item = state
        .engine
        .create_recurring_item(NewRecurringItemCmd {
            user_id: user.username.clone(),
            kind: match payload.kind {
                ApiKind::Income => TransactionKind::Income,
                ApiKind::Expense => TransactionKind::Expense,
            },
            amount_cents: payload.amount_cents,
            description: payload.description,
            due_day: payload.due_day,
            frequency: payload
                .frequency
                .map(engine_frequency)
                .unwrap_or(Frequency::Monthly),
            envelope_id: payload.envelope_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_item(item))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecurringItemUpdate>,
) -> Result<Json<RecurringItemView>, ServerError> {
    let item = state
        .engine
        .update_recurring_item(
            &user.username,
            id,
            UpdateRecurringItemCmd {
                amount_cents: payload.amount_cents,
                description: payload.description,
                due_day: payload.due_day,
                frequency: payload.frequency.map(engine_frequency),
                active: payload.active,
                envelope_id: payload.envelope_id,
            },
        )
        .await?;
    Ok(Json(map_item(item)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_recurring_item(&user.username, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
