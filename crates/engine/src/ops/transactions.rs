//! Transaction mutation engine.
//!
//! The reverse-then-reapply discipline lives here: editing or deleting a
//! transaction first undoes its recorded effect on envelope balances (using
//! the ORIGINAL amount, envelope and month), then applies the new effect
//! with the same branching as creation. Balances are therefore maintained
//! incrementally and never need a recompute from transaction history.

use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};
use sea_orm::DatabaseTransaction;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CreateTransactionCmd, EngineError, Month, ResultEngine, Transaction, TransactionKind,
    UpdateTransactionCmd, transactions,
};

use super::{Engine, apply_text_patch, normalize_optional_text, require_positive, with_tx};

/// Filters for transaction listing.
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub kind: Option<TransactionKind>,
    pub envelope_id: Option<Uuid>,
}

/// Aggregated income/expense totals for one month.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummary {
    pub total_income_cents: i64,
    pub total_expense_cents: i64,
    pub net_cents: i64,
    pub income_count: i64,
    pub expense_count: i64,
}

impl Engine {
    /// Create a transaction and apply its envelope effects in one atomic
    /// unit.
    ///
    /// Incomes are distributed over the envelope set of the date's month and
    /// require it to be configured. Expenses must name an envelope the
    /// caller owns.
    pub async fn create_transaction(
        &self,
        cmd: CreateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        require_positive(cmd.amount_cents, "amount_cents")?;
        let description = normalize_optional_text(cmd.description.as_deref());
        with_tx!(self, |db_tx| {
            let envelope_id = self
                .validated_envelope_for(&db_tx, cmd.kind, cmd.envelope_id, &cmd.user_id)
                .await?;

            let tx = Transaction::new(
                cmd.user_id.clone(),
                cmd.kind,
                cmd.amount_cents,
                cmd.occurred_on,
                description,
                envelope_id,
                Utc::now(),
            )?;
            transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

            self.apply_effect(&db_tx, &tx).await?;
            Ok(tx)
        })
    }

    /// Edit a transaction: reverse the original effect, patch the row,
    /// reapply the new effect. Any failure rolls all three back.
    pub async fn update_transaction(
        &self,
        cmd: UpdateTransactionCmd,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, cmd.transaction_id, &cmd.user_id)
                .await?;
            let original = Transaction::try_from(model)?;

            self.reverse_effect(&db_tx, &original).await?;

            let kind = cmd.kind.unwrap_or(original.kind);
            let amount_cents = cmd.amount_cents.unwrap_or(original.amount_cents);
            require_positive(amount_cents, "amount_cents")?;
            let occurred_on = cmd.occurred_on.unwrap_or(original.occurred_on);
            let description =
                apply_text_patch(original.description.clone(), cmd.description.as_deref());

            let envelope_id = match kind {
                TransactionKind::Expense => {
                    let id = cmd.envelope_id.or(original.envelope_id);
                    self.validated_envelope_for(&db_tx, kind, id, &cmd.user_id)
                        .await?
                }
                TransactionKind::Income => None,
            };

            let updated = Transaction {
                id: original.id,
                user_id: original.user_id.clone(),
                kind,
                amount_cents,
                occurred_on,
                description,
                envelope_id,
                created_at: original.created_at,
            };

            let patch = transactions::ActiveModel {
                id: ActiveValue::Set(updated.id.to_string()),
                kind: ActiveValue::Set(updated.kind.as_str().to_string()),
                amount_cents: ActiveValue::Set(updated.amount_cents),
                occurred_on: ActiveValue::Set(updated.occurred_on),
                description: ActiveValue::Set(updated.description.clone()),
                envelope_id: ActiveValue::Set(updated.envelope_id.map(|id| id.to_string())),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            self.apply_effect(&db_tx, &updated).await?;
            Ok(updated)
        })
    }

    /// Delete a transaction after reversing its effect.
    pub async fn delete_transaction(
        &self,
        user_id: &str,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_transaction(&db_tx, transaction_id, user_id)
                .await?;
            let tx = Transaction::try_from(model)?;

            self.reverse_effect(&db_tx, &tx).await?;

            transactions::Entity::delete_by_id(transaction_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// List the user's transactions, newest first.
    pub async fn list_transactions(
        &self,
        user_id: &str,
        filter: &TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::OccurredOn)
            .order_by_desc(transactions::Column::CreatedAt);

        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::OccurredOn.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::OccurredOn.lte(to));
        }
        if let Some(kind) = filter.kind {
            query = query.filter(transactions::Column::Kind.eq(kind.as_str()));
        }
        if let Some(envelope_id) = filter.envelope_id {
            query = query.filter(transactions::Column::EnvelopeId.eq(envelope_id.to_string()));
        }

        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Income/expense totals for one month.
    pub async fn monthly_summary(
        &self,
        user_id: &str,
        month: &Month,
    ) -> ResultEngine<MonthlySummary> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT \
               COALESCE(SUM(CASE WHEN kind = 'income' THEN amount_cents ELSE 0 END), 0) AS income, \
               COALESCE(SUM(CASE WHEN kind = 'expense' THEN amount_cents ELSE 0 END), 0) AS expense, \
               COALESCE(SUM(CASE WHEN kind = 'income' THEN 1 ELSE 0 END), 0) AS income_count, \
               COALESCE(SUM(CASE WHEN kind = 'expense' THEN 1 ELSE 0 END), 0) AS expense_count \
             FROM transactions \
             WHERE user_id = ? AND occurred_on >= ? AND occurred_on <= ?",
            vec![
                user_id.into(),
                month.first_day().into(),
                month.last_day().into(),
            ],
        );
        let row = self
            .database
            .query_one(stmt)
            .await?
            .ok_or_else(|| EngineError::NotFound("summary".to_string()))?;

        let total_income_cents: i64 = row.try_get("", "income").unwrap_or(0);
        let total_expense_cents: i64 = row.try_get("", "expense").unwrap_or(0);
        Ok(MonthlySummary {
            total_income_cents,
            total_expense_cents,
            net_cents: total_income_cents - total_expense_cents,
            income_count: row.try_get("", "income_count").unwrap_or(0),
            expense_count: row.try_get("", "expense_count").unwrap_or(0),
        })
    }

    /// Resolve and ownership-check the envelope for a transaction kind.
    /// Expenses must reference one; incomes never carry one.
    async fn validated_envelope_for(
        &self,
        db_tx: &DatabaseTransaction,
        kind: TransactionKind,
        envelope_id: Option<Uuid>,
        user_id: &str,
    ) -> ResultEngine<Option<Uuid>> {
        match kind {
            TransactionKind::Expense => {
                let id = envelope_id.ok_or_else(|| {
                    EngineError::InvalidInput(
                        "an expense must be linked to an envelope".to_string(),
                    )
                })?;
                self.require_envelope(db_tx, id, user_id).await?;
                Ok(Some(id))
            }
            TransactionKind::Income => Ok(None),
        }
    }

    async fn apply_effect(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        match tx.kind {
            TransactionKind::Income => {
                self.distribute_income(db_tx, &tx.user_id, &tx.month(), tx.amount_cents)
                    .await
            }
            TransactionKind::Expense => match tx.envelope_id {
                Some(envelope_id) => {
                    self.debit_envelope(db_tx, envelope_id, tx.amount_cents).await
                }
                None => Err(EngineError::InvalidInput(
                    "an expense must be linked to an envelope".to_string(),
                )),
            },
        }
    }

    async fn reverse_effect(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        match tx.kind {
            TransactionKind::Income => {
                self.retract_income(db_tx, &tx.user_id, &tx.month(), tx.amount_cents)
                    .await
            }
            TransactionKind::Expense => match tx.envelope_id {
                Some(envelope_id) => {
                    self.credit_envelope(db_tx, envelope_id, tx.amount_cents).await
                }
                // Expense rows always carry an envelope when written; a
                // missing link means there is nothing left to reverse.
                None => Ok(()),
            },
        }
    }
}
