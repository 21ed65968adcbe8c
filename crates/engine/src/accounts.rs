//! Bank accounts.
//!
//! Accounts hold the cash that invoice payments draw from. The balance may go
//! negative; like envelopes, overdraft is surfaced, not rejected.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    /// Free-form kind label (checking, savings, ...).
    pub kind: String,
    pub initial_cents: i64,
    pub balance_cents: i64,
}

impl Account {
    pub fn new(user_id: &str, name: String, kind: String, initial_cents: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            name,
            kind,
            initial_cents,
            balance_cents: initial_cents,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub initial_cents: i64,
    pub balance_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            user_id: ActiveValue::Set(account.user_id.clone()),
            name: ActiveValue::Set(account.name.clone()),
            kind: ActiveValue::Set(account.kind.clone()),
            initial_cents: ActiveValue::Set(account.initial_cents),
            balance_cents: ActiveValue::Set(account.balance_cents),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("account".to_string()))?,
            user_id: model.user_id,
            name: model.name,
            kind: model.kind,
            initial_cents: model.initial_cents,
            balance_cents: model.balance_cents,
        })
    }
}
