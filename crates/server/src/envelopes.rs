//! Envelope API endpoints

use api_types::envelope::{
    Distribute, EnvelopeConfigure, EnvelopeList, EnvelopeView, EnvelopesResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{ConfigureEnvelopesCmd, Envelope, EnvelopeTarget, Month, users};

pub(crate) fn month_or_current(month: Option<&str>) -> Result<Month, ServerError> {
    match month {
        Some(value) => value.parse().map_err(ServerError::from),
        None => Ok(Month::from_date(Utc::now().date_naive())),
    }
}

fn map_envelope(envelope: Envelope) -> EnvelopeView {
    EnvelopeView {
        id: envelope.id,
        name: envelope.name,
        month: envelope.month.as_str().to_string(),
        target_percent: envelope.target_percent,
        allocated_cents: envelope.allocated_cents,
        spent_cents: envelope.spent_cents,
        available_cents: envelope.available_cents,
    }
}

fn map_envelopes(envelopes: Vec<Envelope>) -> EnvelopesResponse {
    EnvelopesResponse {
        envelopes: envelopes.into_iter().map(map_envelope).collect(),
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<EnvelopeList>,
) -> Result<Json<EnvelopesResponse>, ServerError> {
    let month = month_or_current(payload.month.as_deref())?;
    let envelopes = state.engine.list_envelopes(&user.username, &month).await?;
    Ok(Json(map_envelopes(envelopes)))
}

pub async fn configure(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<EnvelopeConfigure>,
) -> Result<Json<EnvelopesResponse>, ServerError> {
    let month = month_or_current(payload.month.as_deref())?;
    let envelopes = state
        .engine
        .configure_envelopes(ConfigureEnvelopesCmd {
            user_id: user.username.clone(),
            month,
            targets: payload
                .envelopes
                .into_iter()
                .map(|target| EnvelopeTarget {
                    name: target.name,
                    target_percent: target.target_percent,
                })
                .collect(),
        })
        .await?;

    Ok(Json(map_envelopes(envelopes)))
}

pub async fn distribute(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<Distribute>,
) -> Result<Json<EnvelopesResponse>, ServerError> {
    let month = month_or_current(payload.month.as_deref())?;
    let envelopes = state
        .engine
        .allocate_income(&user.username, &month, payload.amount_cents)
        .await?;
    Ok(Json(map_envelopes(envelopes)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_envelope(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
