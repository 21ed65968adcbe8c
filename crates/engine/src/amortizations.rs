//! Amortization records: one partial or full payment against a debt, funded
//! from an envelope.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amortization {
    pub id: Uuid,
    pub debt_id: Uuid,
    pub envelope_id: Uuid,
    pub amount_cents: i64,
    pub paid_on: NaiveDate,
    pub note: Option<String>,
}

impl Amortization {
    pub fn new(
        debt_id: Uuid,
        envelope_id: Uuid,
        amount_cents: i64,
        paid_on: NaiveDate,
        note: Option<String>,
    ) -> Result<Self, EngineError> {
        if amount_cents <= 0 {
            return Err(EngineError::InvalidInput(
                "amount_cents must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            debt_id,
            envelope_id,
            amount_cents,
            paid_on,
            note,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "amortizations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub debt_id: String,
    pub envelope_id: String,
    pub amount_cents: i64,
    pub paid_on: Date,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::debts::Entity",
        from = "Column::DebtId",
        to = "super::debts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Debts,
}

impl Related<super::debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Debts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Amortization> for ActiveModel {
    fn from(amortization: &Amortization) -> Self {
        Self {
            id: ActiveValue::Set(amortization.id.to_string()),
            debt_id: ActiveValue::Set(amortization.debt_id.to_string()),
            envelope_id: ActiveValue::Set(amortization.envelope_id.to_string()),
            amount_cents: ActiveValue::Set(amortization.amount_cents),
            paid_on: ActiveValue::Set(amortization.paid_on),
            note: ActiveValue::Set(amortization.note.clone()),
        }
    }
}

impl TryFrom<Model> for Amortization {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("amortization".to_string()))?,
            debt_id: Uuid::parse_str(&model.debt_id)
                .map_err(|_| EngineError::NotFound("debt".to_string()))?,
            envelope_id: Uuid::parse_str(&model.envelope_id)
                .map_err(|_| EngineError::NotFound("envelope".to_string()))?,
            amount_cents: model.amount_cents,
            paid_on: model.paid_on,
            note: model.note,
        })
    }
}
