//! Balance debits and credits.
//!
//! Every mutation here is a single relative SQL update (`spent = spent + d`)
//! rather than an engine-side read-modify-write, so two operations racing on
//! the same row cannot lose an update under read-committed isolation.
//! `available_cents` is re-derived from `allocated - spent` inside the same
//! statement and is never written from a previously read value.
//!
//! No floor is applied anywhere: a negative envelope `available_cents` (or a
//! negative account balance) is the overspend signal surfaced to clients,
//! not an error condition.

use sea_orm::sea_query::Expr;
use sea_orm::{DatabaseTransaction, QueryFilter, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, accounts, cards, envelopes};

use super::Engine;

impl Engine {
    /// `spent += amount`, `available = allocated - spent`.
    pub(super) async fn debit_envelope(
        &self,
        db_tx: &DatabaseTransaction,
        envelope_id: Uuid,
        amount_cents: i64,
    ) -> ResultEngine<()> {
        self.shift_envelope_spent(db_tx, envelope_id, amount_cents)
            .await
    }

    /// `spent -= amount`, `available = allocated - spent`. Reversal of a
    /// prior debit.
    pub(super) async fn credit_envelope(
        &self,
        db_tx: &DatabaseTransaction,
        envelope_id: Uuid,
        amount_cents: i64,
    ) -> ResultEngine<()> {
        self.shift_envelope_spent(db_tx, envelope_id, -amount_cents)
            .await
    }

    async fn shift_envelope_spent(
        &self,
        db_tx: &DatabaseTransaction,
        envelope_id: Uuid,
        delta_cents: i64,
    ) -> ResultEngine<()> {
        let spent_after = Expr::col(envelopes::Column::SpentCents).add(delta_cents);
        let result = envelopes::Entity::update_many()
            .col_expr(envelopes::Column::SpentCents, spent_after.clone())
            .col_expr(
                envelopes::Column::AvailableCents,
                Expr::col(envelopes::Column::AllocatedCents).sub(spent_after),
            )
            .filter(envelopes::Column::Id.eq(envelope_id.to_string()))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound("envelope".to_string()));
        }
        Ok(())
    }

    /// `allocated += delta`, `available = allocated - spent`. Used by income
    /// distribution (positive delta) and its reversal (negative delta).
    pub(super) async fn shift_envelope_allocated(
        &self,
        db_tx: &DatabaseTransaction,
        envelope_id: &str,
        delta_cents: i64,
    ) -> ResultEngine<()> {
        let allocated_after = Expr::col(envelopes::Column::AllocatedCents).add(delta_cents);
        let result = envelopes::Entity::update_many()
            .col_expr(envelopes::Column::AllocatedCents, allocated_after.clone())
            .col_expr(
                envelopes::Column::AvailableCents,
                allocated_after.sub(Expr::col(envelopes::Column::SpentCents)),
            )
            .filter(envelopes::Column::Id.eq(envelope_id))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound("envelope".to_string()));
        }
        Ok(())
    }

    /// Debit a bank account. No sufficiency check; overdraft is allowed.
    pub(super) async fn debit_account(
        &self,
        db_tx: &DatabaseTransaction,
        account_id: Uuid,
        amount_cents: i64,
    ) -> ResultEngine<()> {
        let result = accounts::Entity::update_many()
            .col_expr(
                accounts::Column::BalanceCents,
                Expr::col(accounts::Column::BalanceCents).sub(amount_cents),
            )
            .filter(accounts::Column::Id.eq(account_id.to_string()))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound("account".to_string()));
        }
        Ok(())
    }

    /// Release card limit after an invoice payment.
    pub(super) async fn credit_card_limit(
        &self,
        db_tx: &DatabaseTransaction,
        card_id: Uuid,
        amount_cents: i64,
    ) -> ResultEngine<()> {
        let result = cards::Entity::update_many()
            .col_expr(
                cards::Column::AvailableLimitCents,
                Expr::col(cards::Column::AvailableLimitCents).add(amount_cents),
            )
            .filter(cards::Column::Id.eq(card_id.to_string()))
            .exec(db_tx)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::NotFound("card".to_string()));
        }
        Ok(())
    }
}
