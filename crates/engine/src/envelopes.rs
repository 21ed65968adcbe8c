//! The module contains the representation of an envelope.
//!
//! An envelope is a named budget bucket scoped to one user and one calendar
//! month. A configured `target_percent` defines the envelope's share of every
//! income distributed in that month. Balances are kept incrementally:
//! `allocated_cents` grows with incomes, `spent_cents` grows with debits, and
//! `available_cents` is always re-derived as `allocated - spent` inside the
//! same write that touches either of them. It is never an independent source
//! of truth.
//!
//! `available_cents` may go negative. Overspending is a signal surfaced to
//! clients, not an error.

use sea_orm::entity::{ActiveValue, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Month};

/// A monthly budget envelope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub month: Month,
    /// Share of each income, whole percent (0-100).
    pub target_percent: i32,
    pub allocated_cents: i64,
    pub spent_cents: i64,
    pub available_cents: i64,
}

impl Envelope {
    pub fn new(
        user_id: &str,
        name: String,
        month: Month,
        target_percent: i32,
    ) -> Result<Self, EngineError> {
        if !(0..=100).contains(&target_percent) {
            return Err(EngineError::InvalidInput(format!(
                "target percent must be between 0 and 100, got {target_percent}"
            )));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name,
            month,
            target_percent,
            allocated_cents: 0,
            spent_cents: 0,
            available_cents: 0,
        })
    }

    /// This envelope's share of an income amount, in cents.
    ///
    /// Truncating integer division: the same inputs always produce the same
    /// share, so distributing and later retracting an income round-trips
    /// exactly. With percentages summing to 100 the shares sum to the income
    /// amount, up to at most one cent lost per envelope to truncation.
    #[must_use]
    pub fn share_of(&self, amount_cents: i64) -> i64 {
        amount_cents * i64::from(self.target_percent) / 100
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "envelopes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub month: String,
    pub target_percent: i32,
    pub allocated_cents: i64,
    pub spent_cents: i64,
    pub available_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Username",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Envelope> for ActiveModel {
    fn from(envelope: &Envelope) -> Self {
        Self {
            id: ActiveValue::Set(envelope.id.to_string()),
            user_id: ActiveValue::Set(envelope.user_id.clone()),
            name: ActiveValue::Set(envelope.name.clone()),
            month: ActiveValue::Set(envelope.month.as_str().to_string()),
            target_percent: ActiveValue::Set(envelope.target_percent),
            allocated_cents: ActiveValue::Set(envelope.allocated_cents),
            spent_cents: ActiveValue::Set(envelope.spent_cents),
            available_cents: ActiveValue::Set(envelope.available_cents),
        }
    }
}

impl TryFrom<Model> for Envelope {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("envelope".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            month: model.month.parse()?,
            target_percent: model.target_percent,
            allocated_cents: model.allocated_cents,
            spent_cents: model.spent_cents,
            available_cents: model.available_cents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(percent: i32) -> Envelope {
        Envelope::new(
            "alice",
            "Custos".to_string(),
            "2025-03".parse().unwrap(),
            percent,
        )
        .unwrap()
    }

    #[test]
    fn share_is_truncating() {
        assert_eq!(envelope(30).share_of(100_000), 30_000);
        assert_eq!(envelope(55).share_of(100_000), 55_000);
        assert_eq!(envelope(33).share_of(999), 329);
    }

    #[test]
    fn shares_conserve_amount_when_percents_sum_to_100() {
        let shares: i64 = [30, 15, 55]
            .into_iter()
            .map(|p| envelope(p).share_of(100_000))
            .sum();
        assert_eq!(shares, 100_000);
    }

    #[test]
    fn rejects_percent_out_of_range() {
        let err = Envelope::new(
            "alice",
            "Custos".to_string(),
            "2025-03".parse().unwrap(),
            101,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
}
