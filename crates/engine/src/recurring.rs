//! Recurring items: monthly or yearly expected movements.
//!
//! The engine does not schedule anything from these rows (there are no
//! background workers); they are bookkeeping the client materializes into
//! real transactions. They matter to the core because deleting an envelope
//! must clear their link.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, TransactionKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidInput(format!(
                "invalid frequency: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringItem {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub description: String,
    /// Day of month the movement is expected (1-31).
    pub due_day: i32,
    pub frequency: Frequency,
    pub active: bool,
    pub envelope_id: Option<Uuid>,
}

impl RecurringItem {
    pub fn new(
        user_id: &str,
        kind: TransactionKind,
        amount_cents: i64,
        description: String,
        due_day: i32,
        frequency: Frequency,
        envelope_id: Option<Uuid>,
    ) -> Result<Self, EngineError> {
        if amount_cents <= 0 {
            return Err(EngineError::InvalidInput(
                "amount_cents must be > 0".to_string(),
            ));
        }
        if !(1..=31).contains(&due_day) {
            return Err(EngineError::InvalidInput(format!(
                "due_day must be between 1 and 31, got {due_day}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind,
            amount_cents,
            description,
            due_day,
            frequency,
            active: true,
            envelope_id,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub amount_cents: i64,
    pub description: String,
    pub due_day: i32,
    pub frequency: String,
    pub active: bool,
    pub envelope_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&RecurringItem> for ActiveModel {
    fn from(item: &RecurringItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            user_id: ActiveValue::Set(item.user_id.clone()),
            kind: ActiveValue::Set(item.kind.as_str().to_string()),
            amount_cents: ActiveValue::Set(item.amount_cents),
            description: ActiveValue::Set(item.description.clone()),
            due_day: ActiveValue::Set(item.due_day),
            frequency: ActiveValue::Set(item.frequency.as_str().to_string()),
            active: ActiveValue::Set(item.active),
            envelope_id: ActiveValue::Set(item.envelope_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for RecurringItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("recurring item".to_string()))?,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_cents: model.amount_cents,
            description: model.description,
            due_day: model.due_day,
            frequency: Frequency::try_from(model.frequency.as_str())?,
            active: model.active,
            envelope_id: model.envelope_id.and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}
