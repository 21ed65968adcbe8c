//! Savings goals.
//!
//! A goal completes exactly when `current_cents` reaches `target_cents`.
//! Contributions past completion are accepted and keep incrementing the
//! balance; there is no cap.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidInput(format!(
                "invalid goal status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub target_cents: i64,
    pub current_cents: i64,
    pub status: GoalStatus,
    pub due_on: Option<NaiveDate>,
    pub priority: i32,
    pub envelope_id: Option<Uuid>,
}

impl Goal {
    pub fn new(
        user_id: &str,
        name: String,
        description: Option<String>,
        target_cents: i64,
        due_on: Option<NaiveDate>,
        priority: i32,
        envelope_id: Option<Uuid>,
    ) -> Result<Self, EngineError> {
        if target_cents <= 0 {
            return Err(EngineError::InvalidInput(
                "target_cents must be > 0".to_string(),
            ));
        }
        if !(1..=5).contains(&priority) {
            return Err(EngineError::InvalidInput(format!(
                "priority must be between 1 and 5, got {priority}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name,
            description,
            target_cents,
            current_cents: 0,
            status: GoalStatus::Active,
            due_on,
            priority,
            envelope_id,
        })
    }

    /// Progress toward the target, whole percent. May exceed 100.
    #[must_use]
    pub fn progress_percent(&self) -> i64 {
        if self.target_cents == 0 {
            return 0;
        }
        self.current_cents * 100 / self.target_cents
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub target_cents: i64,
    pub current_cents: i64,
    pub status: String,
    pub due_on: Option<Date>,
    pub priority: i32,
    pub envelope_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::contributions::Entity")]
    Contributions,
}

impl Related<super::contributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            user_id: ActiveValue::Set(goal.user_id.clone()),
            name: ActiveValue::Set(goal.name.clone()),
            description: ActiveValue::Set(goal.description.clone()),
            target_cents: ActiveValue::Set(goal.target_cents),
            current_cents: ActiveValue::Set(goal.current_cents),
            status: ActiveValue::Set(goal.status.as_str().to_string()),
            due_on: ActiveValue::Set(goal.due_on),
            priority: ActiveValue::Set(goal.priority),
            envelope_id: ActiveValue::Set(goal.envelope_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("goal".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            description: model.description,
            target_cents: model.target_cents,
            current_cents: model.current_cents,
            status: GoalStatus::try_from(model.status.as_str())?,
            due_on: model.due_on,
            priority: model.priority,
            envelope_id: model.envelope_id.and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}
