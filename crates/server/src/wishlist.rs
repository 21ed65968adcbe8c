//! Wishlist API endpoints

use api_types::wishlist::{
    Purchase, WishlistItemNew, WishlistItemUpdate, WishlistItemView,
    WishlistResponse, WishlistStatus as ApiStatus,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{
    NewWishlistItemCmd, PurchaseWishlistItemCmd, UpdateWishlistItemCmd, WishlistItem,
    WishlistStatus, users,
};

fn map_status(status: WishlistStatus) -> ApiStatus {
    match status {
        WishlistStatus::Wanting => ApiStatus::Wanting,
        WishlistStatus::Saving => ApiStatus::Saving,
        WishlistStatus::Bought => ApiStatus::Bought,
        WishlistStatus::Cancelled => ApiStatus::Cancelled,
    }
}

fn engine_status(status: ApiStatus) -> WishlistStatus {
    match status {
        ApiStatus::Wanting => WishlistStatus::Wanting,
        ApiStatus::Saving => WishlistStatus::Saving,
        ApiStatus::Bought => WishlistStatus::Bought,
        ApiStatus::Cancelled => WishlistStatus::Cancelled,
    }
}

fn map_item(item: WishlistItem) -> WishlistItemView {
    let months_to_purchase = item.months_to_purchase();
    WishlistItemView {
        id: item.id,
        description: item.description,
        estimated_cents: item.estimated_cents,
        monthly_contribution_cents: item.monthly_contribution_cents,
        status: map_status(item.status),
        envelope_id: item.envelope_id,
        months_to_purchase,
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<WishlistResponse>, ServerError> {
    let items = state.engine.list_wishlist(&user.username).await?;
    Ok(Json(WishlistResponse {
        items: items.into_iter().map(map_item).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<WishlistItemNew>,
) -> Result<(StatusCode, Json<WishlistItemView>), ServerError> {
    let item = state
        .engine
        .create_wishlist_item(NewWishlistItemCmd {
            user_id: user.username.clone(),
            description: payload.description,
            estimated_cents: payload.estimated_cents,
            monthly_contribution_cents: payload.monthly_contribution_cents.unwrap_or(0),
            envelope_id: payload.envelope_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_item(item))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<WishlistItemUpdate>,
) -> Result<Json<WishlistItemView>, ServerError> {
    let mut item = state
        .engine
        .update_wishlist_item(
            &user.username,
            id,
            UpdateWishlistItemCmd {
                description: payload.description,
                estimated_cents: payload.estimated_cents,
                monthly_contribution_cents: payload.monthly_contribution_cents,
                envelope_id: payload.envelope_id,
            },
        )
        .await?;

    if let Some(status) = payload.status {
        item = state
            .engine
            .set_wishlist_status(&user.username, id, engine_status(status))
            .await?;
    }
    Ok(Json(map_item(item)))
}

pub async fn purchase(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Purchase>,
) -> Result<Json<WishlistItemView>, ServerError> {
    let item = state
        .engine
        .purchase_wishlist_item(PurchaseWishlistItemCmd {
            user_id: user.username.clone(),
            item_id: id,
            envelope_id: payload.envelope_id,
            actual_cents: payload.actual_cents,
            purchased_on: payload
                .purchased_on
                .unwrap_or_else(|| Utc::now().date_naive()),
        })
        .await?;
    Ok(Json(map_item(item)))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_wishlist_item(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
