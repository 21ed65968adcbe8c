//! Debt CRUD and history.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Amortization, Debt, DebtStatus, NewDebtCmd, ResultEngine, amortizations, debts,
};

use super::{Engine, normalize_required_name, with_tx};

/// Aggregated debt counters for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtSummary {
    pub total: i64,
    pub pending: i64,
    pub negotiating: i64,
    pub settled: i64,
    /// Sum of `current_cents` over debts that are not settled.
    pub total_owed_cents: i64,
    pub total_original_cents: i64,
}

impl Engine {
    /// Register a new debt. The current balance starts at the original
    /// amount; only amortizations move it.
    pub async fn create_debt(&self, cmd: NewDebtCmd) -> ResultEngine<Debt> {
        let description = normalize_required_name(&cmd.description, "debt")?;
        with_tx!(self, |db_tx| {
            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, &cmd.user_id)
                    .await?;
            }
            let debt = Debt::new(
                &cmd.user_id,
                description,
                cmd.original_cents,
                cmd.monthly_interest_bps,
                cmd.started_on,
                cmd.envelope_id,
            )?;
            debts::ActiveModel::from(&debt).insert(&db_tx).await?;
            Ok(debt)
        })
    }

    /// The user's debts, optionally filtered by status, unsettled first.
    pub async fn list_debts(
        &self,
        user_id: &str,
        status: Option<DebtStatus>,
    ) -> ResultEngine<Vec<Debt>> {
        let mut query = debts::Entity::find()
            .filter(debts::Column::UserId.eq(user_id))
            .order_by_asc(debts::Column::Status)
            .order_by_desc(debts::Column::StartedOn);
        if let Some(status) = status {
            query = query.filter(debts::Column::Status.eq(status.as_str()));
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Debt::try_from)
            .collect()
    }

    /// Explicit status override by the user. The engine itself only ever
    /// moves a debt toward settled; this is the escape hatch.
    pub async fn update_debt_status(
        &self,
        user_id: &str,
        debt_id: Uuid,
        status: DebtStatus,
    ) -> ResultEngine<Debt> {
        with_tx!(self, |db_tx| {
            self.require_debt(&db_tx, debt_id, user_id).await?;
            let patch = debts::ActiveModel {
                id: ActiveValue::Set(debt_id.to_string()),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            patch.update(&db_tx).await?;
            let model = self.require_debt(&db_tx, debt_id, user_id).await?;
            Debt::try_from(model)
        })
    }

    /// Delete a debt; its amortization history cascades away with it.
    pub async fn delete_debt(&self, user_id: &str, debt_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_debt(&db_tx, debt_id, user_id).await?;
            amortizations::Entity::delete_many()
                .filter(amortizations::Column::DebtId.eq(debt_id.to_string()))
                .exec(&db_tx)
                .await?;
            debts::Entity::delete_by_id(debt_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// A debt's amortizations, newest payment first.
    pub async fn list_amortizations(
        &self,
        user_id: &str,
        debt_id: Uuid,
    ) -> ResultEngine<Vec<Amortization>> {
        with_tx!(self, |db_tx| {
            self.require_debt(&db_tx, debt_id, user_id).await?;
            amortizations::Entity::find()
                .filter(amortizations::Column::DebtId.eq(debt_id.to_string()))
                .order_by_desc(amortizations::Column::PaidOn)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Amortization::try_from)
                .collect()
        })
    }

    /// Aggregated debt counters for the user.
    pub async fn debt_summary(&self, user_id: &str) -> ResultEngine<DebtSummary> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT \
               COUNT(*) AS total, \
               COALESCE(SUM(CASE WHEN status = 'pending' THEN 1 ELSE 0 END), 0) AS pending, \
               COALESCE(SUM(CASE WHEN status = 'negotiating' THEN 1 ELSE 0 END), 0) AS negotiating, \
               COALESCE(SUM(CASE WHEN status = 'settled' THEN 1 ELSE 0 END), 0) AS settled, \
               COALESCE(SUM(CASE WHEN status != 'settled' THEN current_cents ELSE 0 END), 0) AS owed, \
               COALESCE(SUM(original_cents), 0) AS original \
             FROM debts WHERE user_id = ?",
            vec![user_id.into()],
        );
        let row = self.database.query_one(stmt).await?;
        let get = |name: &str| -> i64 {
            row.as_ref()
                .and_then(|r| r.try_get("", name).ok())
                .unwrap_or(0)
        };
        Ok(DebtSummary {
            total: get("total"),
            pending: get("pending"),
            negotiating: get("negotiating"),
            settled: get("settled"),
            total_owed_cents: get("owed"),
            total_original_cents: get("original"),
        })
    }
}
