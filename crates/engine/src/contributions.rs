//! Contribution records: one deposit toward a goal, optionally funded from an
//! envelope.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub amount_cents: i64,
    pub contributed_on: NaiveDate,
    pub envelope_id: Option<Uuid>,
    pub note: Option<String>,
}

impl Contribution {
    pub fn new(
        goal_id: Uuid,
        amount_cents: i64,
        contributed_on: NaiveDate,
        envelope_id: Option<Uuid>,
        note: Option<String>,
    ) -> Result<Self, EngineError> {
        if amount_cents <= 0 {
            return Err(EngineError::InvalidInput(
                "amount_cents must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            goal_id,
            amount_cents,
            contributed_on,
            envelope_id,
            note,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "contributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub goal_id: String,
    pub amount_cents: i64,
    pub contributed_on: Date,
    pub envelope_id: Option<String>,
    pub note: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::goals::Entity",
        from = "Column::GoalId",
        to = "super::goals::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Goals,
}

impl Related<super::goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Contribution> for ActiveModel {
    fn from(contribution: &Contribution) -> Self {
        Self {
            id: ActiveValue::Set(contribution.id.to_string()),
            goal_id: ActiveValue::Set(contribution.goal_id.to_string()),
            amount_cents: ActiveValue::Set(contribution.amount_cents),
            contributed_on: ActiveValue::Set(contribution.contributed_on),
            envelope_id: ActiveValue::Set(contribution.envelope_id.map(|id| id.to_string())),
            note: ActiveValue::Set(contribution.note.clone()),
        }
    }
}

impl TryFrom<Model> for Contribution {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("contribution".to_string()))?,
            goal_id: Uuid::parse_str(&model.goal_id)
                .map_err(|_| EngineError::NotFound("goal".to_string()))?,
            amount_cents: model.amount_cents,
            contributed_on: model.contributed_on,
            envelope_id: model.envelope_id.and_then(|s| Uuid::parse_str(&s).ok()),
            note: model.note,
        })
    }
}
