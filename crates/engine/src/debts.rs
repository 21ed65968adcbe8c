//! Debts and their lifecycle.
//!
//! A debt's `current_cents` only ever moves down through amortizations,
//! floored at zero. It flips to `Settled` exactly when the balance reaches
//! zero; explicit status edits by the user may override that (e.g. marking a
//! debt as `Negotiating` again), the engine itself never un-settles.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    Pending,
    Negotiating,
    Settled,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Negotiating => "negotiating",
            Self::Settled => "settled",
        }
    }
}

impl TryFrom<&str> for DebtStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "negotiating" => Ok(Self::Negotiating),
            "settled" => Ok(Self::Settled),
            other => Err(EngineError::InvalidInput(format!(
                "invalid debt status: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub user_id: String,
    pub description: String,
    pub original_cents: i64,
    pub current_cents: i64,
    /// Monthly interest rate in basis points (informational only).
    pub monthly_interest_bps: i32,
    pub status: DebtStatus,
    pub started_on: NaiveDate,
    pub settled_on: Option<NaiveDate>,
    pub envelope_id: Option<Uuid>,
}

impl Debt {
    pub fn new(
        user_id: &str,
        description: String,
        original_cents: i64,
        monthly_interest_bps: i32,
        started_on: NaiveDate,
        envelope_id: Option<Uuid>,
    ) -> Result<Self, EngineError> {
        if original_cents <= 0 {
            return Err(EngineError::InvalidInput(
                "original_cents must be > 0".to_string(),
            ));
        }
        if monthly_interest_bps < 0 {
            return Err(EngineError::InvalidInput(
                "monthly_interest_bps must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            description,
            original_cents,
            current_cents: original_cents,
            monthly_interest_bps,
            status: DebtStatus::Pending,
            started_on,
            settled_on: None,
            envelope_id,
        })
    }

    /// Share of the original amount already amortized, whole percent.
    #[must_use]
    pub fn paid_percent(&self) -> i64 {
        if self.original_cents == 0 {
            return 0;
        }
        (self.original_cents - self.current_cents) * 100 / self.original_cents
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub description: String,
    pub original_cents: i64,
    pub current_cents: i64,
    pub monthly_interest_bps: i32,
    pub status: String,
    pub started_on: Date,
    pub settled_on: Option<Date>,
    pub envelope_id: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::amortizations::Entity")]
    Amortizations,
}

impl Related<super::amortizations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Amortizations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Debt> for ActiveModel {
    fn from(debt: &Debt) -> Self {
        Self {
            id: ActiveValue::Set(debt.id.to_string()),
            user_id: ActiveValue::Set(debt.user_id.clone()),
            description: ActiveValue::Set(debt.description.clone()),
            original_cents: ActiveValue::Set(debt.original_cents),
            current_cents: ActiveValue::Set(debt.current_cents),
            monthly_interest_bps: ActiveValue::Set(debt.monthly_interest_bps),
            status: ActiveValue::Set(debt.status.as_str().to_string()),
            started_on: ActiveValue::Set(debt.started_on),
            settled_on: ActiveValue::Set(debt.settled_on),
            envelope_id: ActiveValue::Set(debt.envelope_id.map(|id| id.to_string())),
        }
    }
}

impl TryFrom<Model> for Debt {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("debt".to_string()))?,
            user_id: model.user_id,
            description: model.description,
            original_cents: model.original_cents,
            current_cents: model.current_cents,
            monthly_interest_bps: model.monthly_interest_bps,
            status: DebtStatus::try_from(model.status.as_str())?,
            started_on: model.started_on,
            settled_on: model.settled_on,
            envelope_id: model.envelope_id.and_then(|s| Uuid::parse_str(&s).ok()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_percent_tracks_amortized_share() {
        let mut debt = Debt::new(
            "alice",
            "Financiamento".to_string(),
            100_000,
            150,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            None,
        )
        .unwrap();
        assert_eq!(debt.paid_percent(), 0);

        debt.current_cents = 60_000;
        assert_eq!(debt.paid_percent(), 40);

        debt.current_cents = 0;
        assert_eq!(debt.paid_percent(), 100);
    }

    #[test]
    fn rejects_non_positive_original() {
        let err = Debt::new(
            "alice",
            "Financiamento".to_string(),
            0,
            0,
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }
}
