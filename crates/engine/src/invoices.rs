//! Card invoices: one billing cycle's accumulated charges.
//!
//! Paying an invoice floors `total_cents` at zero and flips the status to
//! `Paid` exactly when it reaches zero.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Month};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Open,
    Closed,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for InvoiceStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "open" => Ok(Self::Open),
            "closed" => Ok(Self::Closed),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidInput(format!(
                "invalid invoice status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub card_id: Uuid,
    pub month: Month,
    pub total_cents: i64,
    pub status: InvoiceStatus,
    pub closes_on: NaiveDate,
    pub due_on: NaiveDate,
    pub paid_on: Option<NaiveDate>,
}

impl Invoice {
    pub fn new(card_id: Uuid, month: Month, closes_on: NaiveDate, due_on: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            card_id,
            month,
            total_cents: 0,
            status: InvoiceStatus::Open,
            closes_on,
            due_on,
            paid_on: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub card_id: String,
    pub month: String,
    pub total_cents: i64,
    pub status: String,
    pub closes_on: Date,
    pub due_on: Date,
    pub paid_on: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cards::Entity",
        from = "Column::CardId",
        to = "super::cards::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Cards,
}

impl Related<super::cards::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cards.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Invoice> for ActiveModel {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: ActiveValue::Set(invoice.id.to_string()),
            card_id: ActiveValue::Set(invoice.card_id.to_string()),
            month: ActiveValue::Set(invoice.month.as_str().to_string()),
            total_cents: ActiveValue::Set(invoice.total_cents),
            status: ActiveValue::Set(invoice.status.as_str().to_string()),
            closes_on: ActiveValue::Set(invoice.closes_on),
            due_on: ActiveValue::Set(invoice.due_on),
            paid_on: ActiveValue::Set(invoice.paid_on),
        }
    }
}

impl TryFrom<Model> for Invoice {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("invoice".to_string()))?,
            card_id: Uuid::parse_str(&model.card_id)
                .map_err(|_| EngineError::NotFound("card".to_string()))?,
            month: model.month.parse()?,
            total_cents: model.total_cents,
            status: InvoiceStatus::try_from(model.status.as_str())?,
            closes_on: model.closes_on,
            due_on: model.due_on,
            paid_on: model.paid_on,
        })
    }
}
