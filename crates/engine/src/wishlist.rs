//! Wishlist items.
//!
//! An item optionally links to the envelope that will fund it. The purchase
//! projection uses only the stored monthly contribution, so it is stable
//! regardless of the envelope's current balance.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WishlistStatus {
    Wanting,
    Saving,
    Bought,
    Cancelled,
}

impl WishlistStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wanting => "wanting",
            Self::Saving => "saving",
            Self::Bought => "bought",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for WishlistStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "wanting" => Ok(Self::Wanting),
            "saving" => Ok(Self::Saving),
            "bought" => Ok(Self::Bought),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidInput(format!(
                "invalid wishlist status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WishlistItem {
    pub id: Uuid,
    pub user_id: String,
    pub description: String,
    pub estimated_cents: i64,
    /// How much the user plans to set aside per month for this item.
    pub monthly_contribution_cents: i64,
    pub status: WishlistStatus,
    pub envelope_id: Option<Uuid>,
}

impl WishlistItem {
    pub fn new(
        user_id: &str,
        description: String,
        estimated_cents: i64,
        monthly_contribution_cents: i64,
        envelope_id: Option<Uuid>,
    ) -> Result<Self, EngineError> {
        if estimated_cents <= 0 {
            return Err(EngineError::InvalidInput(
                "estimated_cents must be > 0".to_string(),
            ));
        }
        if monthly_contribution_cents < 0 {
            return Err(EngineError::InvalidInput(
                "monthly_contribution_cents must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            description,
            estimated_cents,
            monthly_contribution_cents,
            status: WishlistStatus::Wanting,
            envelope_id,
        })
    }

    /// Months of saving needed at the stored monthly contribution, rounded
    /// up. `None` when no contribution is planned.
    #[must_use]
    pub fn months_to_purchase(&self) -> Option<i64> {
        if self.monthly_contribution_cents <= 0 {
            return None;
        }
        // Equivalent to `i64::div_ceil`, which is unstable on stable Rust.
        let b = self.monthly_contribution_cents;
        let d = self.estimated_cents / b;
        let r = self.estimated_cents % b;
        Some(if (r > 0 && b > 0) || (r < 0 && b < 0) { d + 1 } else { d })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wishlist_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub estimated_cents: i64,
    pub monthly_contribution_cents: i64,
    pub status: String,
    pub envelope_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WishlistItem> for ActiveModel {
    fn from(item: &WishlistItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            user_id: ActiveValue::Set(item.user_id.clone()),
            description: ActiveValue::Set(item.description.clone()),
            estimated_cents: ActiveValue::Set(item.estimated_cents),
            monthly_contribution_cents: ActiveValue::Set(item.monthly_contribution_cents),
            status: ActiveValue::Set(item.status.as_str().to_string()),
            envelope_id: ActiveValue::Set(item.envelope_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for WishlistItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("wishlist item".to_string()))?,
            user_id: model.user_id,
            description: model.description,
            estimated_cents: model.estimated_cents,
            monthly_contribution_cents: model.monthly_contribution_cents,
            status: WishlistStatus::try_from(model.status.as_str())?,
            envelope_id: model.envelope_id.and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_rounds_up() {
        let item = WishlistItem::new("alice", "Bicicleta".to_string(), 90_000, 25_000, None)
            .unwrap();
        assert_eq!(item.months_to_purchase(), Some(4));
    }

    #[test]
    fn projection_absent_without_contribution() {
        let item = WishlistItem::new("alice", "Bicicleta".to_string(), 90_000, 0, None).unwrap();
        assert_eq!(item.months_to_purchase(), None);
    }
}
