//! Credit cards.
//!
//! `available_limit_cents` is the card limit minus currently-unpaid invoice
//! totals. Paying an invoice credits the limit back.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub limit_cents: i64,
    pub available_limit_cents: i64,
    /// Day of month the invoice closes (1-31).
    pub closing_day: i32,
    /// Day of month the invoice is due (1-31).
    pub due_day: i32,
    pub active: bool,
}

impl Card {
    pub fn new(
        user_id: &str,
        name: String,
        brand: Option<String>,
        limit_cents: i64,
        closing_day: i32,
        due_day: i32,
    ) -> Result<Self, EngineError> {
        if limit_cents < 0 {
            return Err(EngineError::InvalidInput(
                "limit_cents must be >= 0".to_string(),
            ));
        }
        for (label, day) in [("closing_day", closing_day), ("due_day", due_day)] {
            if !(1..=31).contains(&day) {
                return Err(EngineError::InvalidInput(format!(
                    "{label} must be between 1 and 31, got {day}"
                )));
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name,
            brand,
            limit_cents,
            available_limit_cents: limit_cents,
            closing_day,
            due_day,
            active: true,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub limit_cents: i64,
    pub available_limit_cents: i64,
    pub closing_day: i32,
    pub due_day: i32,
    pub active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::invoices::Entity")]
    Invoices,
}

impl Related<super::invoices::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Invoices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Card> for ActiveModel {
    fn from(card: &Card) -> Self {
        Self {
            id: ActiveValue::Set(card.id.to_string()),
            user_id: ActiveValue::Set(card.user_id.clone()),
            name: ActiveValue::Set(card.name.clone()),
            brand: ActiveValue::Set(card.brand.clone()),
            limit_cents: ActiveValue::Set(card.limit_cents),
            available_limit_cents: ActiveValue::Set(card.available_limit_cents),
            closing_day: ActiveValue::Set(card.closing_day),
            due_day: ActiveValue::Set(card.due_day),
            active: ActiveValue::Set(card.active),
        }
    }
}

impl TryFrom<Model> for Card {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("card".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            brand: model.brand,
            limit_cents: model.limit_cents,
            available_limit_cents: model.available_limit_cents,
            closing_day: model.closing_day,
            due_day: model.due_day,
            active: model.active,
        })
    }
}
