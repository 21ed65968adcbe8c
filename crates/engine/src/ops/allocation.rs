//! Income distribution over the monthly envelope set.
//!
//! Each envelope's share is `amount * target_percent / 100` in integer
//! cents, recomputed from the percentages stored at the time of the call.
//! Distribution and retraction use the same share computation, so reversing
//! an income restores every balance exactly.
//!
//! The forward direction refuses to run against an empty envelope set (the
//! money would silently vanish); the reverse direction treats an empty set
//! as a no-op, because the envelopes of a past month may have been deleted
//! after the income was recorded.

use sea_orm::{DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*};

use crate::{Envelope, EngineError, Month, ResultEngine, envelopes};

use super::{Engine, require_positive, with_tx};

impl Engine {
    /// Distribute an income amount over the envelope set of a month and
    /// return the updated set.
    ///
    /// This is the standalone operation behind the "distribute" endpoint;
    /// income transactions go through the same internal routine inside their
    /// own transaction.
    pub async fn allocate_income(
        &self,
        user_id: &str,
        month: &Month,
        amount_cents: i64,
    ) -> ResultEngine<Vec<Envelope>> {
        require_positive(amount_cents, "amount_cents")?;
        with_tx!(self, |db_tx| {
            self.distribute_income(&db_tx, user_id, month, amount_cents)
                .await?;
            self.envelope_set(&db_tx, user_id, month).await
        })
    }

    /// Apply an income's envelope effects. Fails with
    /// [`EngineError::NoEnvelopesConfigured`] when the month has no
    /// envelopes.
    pub(super) async fn distribute_income(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        month: &Month,
        amount_cents: i64,
    ) -> ResultEngine<()> {
        let envelopes = self.envelope_set(db_tx, user_id, month).await?;
        if envelopes.is_empty() {
            return Err(EngineError::NoEnvelopesConfigured(
                month.as_str().to_string(),
            ));
        }
        self.shift_month_allocations(db_tx, &envelopes, amount_cents, 1)
            .await
    }

    /// Reverse an income's envelope effects. A month whose envelopes are
    /// gone reverses to nothing.
    pub(super) async fn retract_income(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        month: &Month,
        amount_cents: i64,
    ) -> ResultEngine<()> {
        let envelopes = self.envelope_set(db_tx, user_id, month).await?;
        self.shift_month_allocations(db_tx, &envelopes, amount_cents, -1)
            .await
    }

    async fn shift_month_allocations(
        &self,
        db_tx: &DatabaseTransaction,
        envelopes: &[Envelope],
        amount_cents: i64,
        sign: i64,
    ) -> ResultEngine<()> {
        for envelope in envelopes {
            let share = envelope.share_of(amount_cents);
            if share == 0 {
                continue;
            }
            self.shift_envelope_allocated(db_tx, &envelope.id.to_string(), sign * share)
                .await?;
        }
        Ok(())
    }

    /// The month's envelope set, freshly read, ordered by name.
    pub(super) async fn envelope_set(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: &str,
        month: &Month,
    ) -> ResultEngine<Vec<Envelope>> {
        envelopes::Entity::find()
            .filter(envelopes::Column::UserId.eq(user_id))
            .filter(envelopes::Column::Month.eq(month.as_str()))
            .order_by_asc(envelopes::Column::Name)
            .all(db_tx)
            .await?
            .into_iter()
            .map(Envelope::try_from)
            .collect()
    }
}
