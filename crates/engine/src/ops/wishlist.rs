//! Wishlist CRUD. The purchase settlement lives in `settlements`.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewWishlistItemCmd, ResultEngine, UpdateWishlistItemCmd, WishlistItem,
    WishlistStatus, wishlist,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a new wishlist item.
    pub async fn create_wishlist_item(
        &self,
        cmd: NewWishlistItemCmd,
    ) -> ResultEngine<WishlistItem> {
        let description = normalize_required_name(&cmd.description, "wishlist item")?;
        with_tx!(self, |db_tx| {
            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, &cmd.user_id)
                    .await?;
            }
            let item = WishlistItem::new(
                &cmd.user_id,
                description,
                cmd.estimated_cents,
                cmd.monthly_contribution_cents,
                cmd.envelope_id,
            )?;
            wishlist::ActiveModel::from(&item).insert(&db_tx).await?;
            Ok(item)
        })
    }

    /// The user's wishlist.
    pub async fn list_wishlist(&self, user_id: &str) -> ResultEngine<Vec<WishlistItem>> {
        wishlist::Entity::find()
            .filter(wishlist::Column::UserId.eq(user_id))
            .order_by_asc(wishlist::Column::Description)
            .all(&self.database)
            .await?
            .into_iter()
            .map(WishlistItem::try_from)
            .collect()
    }

    /// Patch wishlist item fields. Bought items are frozen.
    pub async fn update_wishlist_item(
        &self,
        user_id: &str,
        item_id: Uuid,
        cmd: UpdateWishlistItemCmd,
    ) -> ResultEngine<WishlistItem> {
        with_tx!(self, |db_tx| {
            let model = self.require_wishlist_item(&db_tx, item_id, user_id).await?;
            let item = WishlistItem::try_from(model)?;
            if item.status == WishlistStatus::Bought {
                return Err(EngineError::InvalidInput(format!(
                    "\"{}\" is already bought",
                    item.description
                )));
            }

            let description = match cmd.description.as_deref() {
                Some(value) => normalize_required_name(value, "wishlist item")?,
                None => item.description.clone(),
            };
            let estimated_cents = cmd.estimated_cents.unwrap_or(item.estimated_cents);
            if estimated_cents <= 0 {
                return Err(EngineError::InvalidInput(
                    "estimated_cents must be > 0".to_string(),
                ));
            }
            let monthly = cmd
                .monthly_contribution_cents
                .unwrap_or(item.monthly_contribution_cents);
            if monthly < 0 {
                return Err(EngineError::InvalidInput(
                    "monthly_contribution_cents must be >= 0".to_string(),
                ));
            }
            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, user_id).await?;
            }

            let patch = wishlist::ActiveModel {
                id: ActiveValue::Set(item_id.to_string()),
                description: ActiveValue::Set(description),
                estimated_cents: ActiveValue::Set(estimated_cents),
                monthly_contribution_cents: ActiveValue::Set(monthly),
                envelope_id: ActiveValue::Set(
                    cmd.envelope_id.or(item.envelope_id).map(|id| id.to_string()),
                ),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            let model = self.require_wishlist_item(&db_tx, item_id, user_id).await?;
            WishlistItem::try_from(model)
        })
    }

    /// Update just the saving status (wanting/saving/cancelled). Buying goes
    /// through the purchase settlement so balances move with it.
    pub async fn set_wishlist_status(
        &self,
        user_id: &str,
        item_id: Uuid,
        status: WishlistStatus,
    ) -> ResultEngine<WishlistItem> {
        if status == WishlistStatus::Bought {
            return Err(EngineError::InvalidInput(
                "use the purchase operation to mark an item bought".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            self.require_wishlist_item(&db_tx, item_id, user_id).await?;
            let patch = wishlist::ActiveModel {
                id: ActiveValue::Set(item_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            patch.update(&db_tx).await?;
            let model = self.require_wishlist_item(&db_tx, item_id, user_id).await?;
            WishlistItem::try_from(model)
        })
    }

    pub async fn delete_wishlist_item(&self, user_id: &str, item_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_wishlist_item(&db_tx, item_id, user_id).await?;
            wishlist::Entity::delete_by_id(item_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
