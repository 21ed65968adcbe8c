//! Card CRUD and invoice retrieval.

use chrono::{Datelike, NaiveDate};
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Card, EngineError, Invoice, Month, NewCardCmd, ResultEngine, cards, invoices,
};

use super::{Engine, normalize_required_name, with_tx};

/// The given day of a month, clamped to the month's length (a closing day of
/// 31 falls on Feb 28).
fn day_in_month(month: &Month, day: i32) -> NaiveDate {
    let last = month.last_day();
    let clamped = u32::try_from(day.clamp(1, 31))
        .unwrap_or(1)
        .min(last.day());
    month.first_day().with_day(clamped).unwrap_or(last)
}

impl Engine {
    /// Register a new card. The available limit starts at the full limit.
    pub async fn create_card(&self, cmd: NewCardCmd) -> ResultEngine<Card> {
        let name = normalize_required_name(&cmd.name, "card")?;
        with_tx!(self, |db_tx| {
            let card = Card::new(
                &cmd.user_id,
                name,
                cmd.brand.clone(),
                cmd.limit_cents,
                cmd.closing_day,
                cmd.due_day,
            )?;
            cards::ActiveModel::from(&card).insert(&db_tx).await?;
            Ok(card)
        })
    }

    /// The user's cards ordered by name.
    pub async fn list_cards(&self, user_id: &str) -> ResultEngine<Vec<Card>> {
        cards::Entity::find()
            .filter(cards::Column::UserId.eq(user_id))
            .order_by_asc(cards::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Card::try_from)
            .collect()
    }

    /// Deactivate or reactivate a card. Limits and invoices stay untouched.
    pub async fn set_card_active(
        &self,
        user_id: &str,
        card_id: Uuid,
        active: bool,
    ) -> ResultEngine<Card> {
        with_tx!(self, |db_tx| {
            self.require_card(&db_tx, card_id, user_id).await?;
            let patch = cards::ActiveModel {
                id: ActiveValue::Set(card_id.to_string()),
                active: ActiveValue::Set(active),
                ..Default::default()
            };
            patch.update(&db_tx).await?;
            let model = self.require_card(&db_tx, card_id, user_id).await?;
            Card::try_from(model)
        })
    }

    /// Delete a card; its invoices cascade away with it.
    pub async fn delete_card(&self, user_id: &str, card_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_card(&db_tx, card_id, user_id).await?;
            invoices::Entity::delete_many()
                .filter(invoices::Column::CardId.eq(card_id.to_string()))
                .exec(&db_tx)
                .await?;
            cards::Entity::delete_by_id(card_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// A card's invoices, newest reference month first.
    pub async fn list_invoices(
        &self,
        user_id: &str,
        card_id: Uuid,
    ) -> ResultEngine<Vec<Invoice>> {
        with_tx!(self, |db_tx| {
            self.require_card(&db_tx, card_id, user_id).await?;
            invoices::Entity::find()
                .filter(invoices::Column::CardId.eq(card_id.to_string()))
                .order_by_desc(invoices::Column::Month)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Invoice::try_from)
                .collect()
        })
    }

    /// The card's invoice currently accumulating charges, created on first
    /// access.
    ///
    /// Past the closing day, new charges belong to the NEXT month's invoice;
    /// the reference month moves forward accordingly.
    pub async fn current_invoice(
        &self,
        user_id: &str,
        card_id: Uuid,
        today: NaiveDate,
    ) -> ResultEngine<Invoice> {
        with_tx!(self, |db_tx| {
            let card_model = self.require_card(&db_tx, card_id, user_id).await?;
            let card = Card::try_from(card_model)?;

            let this_month = Month::from_date(today);
            let reference = if i32::try_from(today.day()).unwrap_or(1) > card.closing_day {
                this_month.next()
            } else {
                this_month
            };

            let existing = invoices::Entity::find()
                .filter(invoices::Column::CardId.eq(card_id.to_string()))
                .filter(invoices::Column::Month.eq(reference.as_str()))
                .one(&db_tx)
                .await?;
            if let Some(model) = existing {
                return Invoice::try_from(model);
            }

            let closes_on = day_in_month(&reference, card.closing_day);
            let due_on = day_in_month(&reference, card.due_day);
            let invoice = Invoice::new(card_id, reference, closes_on, due_on);
            invoices::ActiveModel::from(&invoice).insert(&db_tx).await?;
            Ok(invoice)
        })
    }

    /// Add a charge to an invoice (e.g. a card purchase). Consumes card
    /// limit; paying the invoice gives it back.
    pub async fn charge_invoice(
        &self,
        user_id: &str,
        card_id: Uuid,
        invoice_id: Uuid,
        amount_cents: i64,
    ) -> ResultEngine<Invoice> {
        super::require_positive(amount_cents, "amount_cents")?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_invoice_on_card(&db_tx, invoice_id, card_id, user_id)
                .await?;
            let invoice = Invoice::try_from(model)?;
            if invoice.status == crate::InvoiceStatus::Paid {
                return Err(EngineError::InvalidInput(
                    "cannot charge a paid invoice".to_string(),
                ));
            }

            let patch = invoices::ActiveModel {
                id: ActiveValue::Set(invoice_id.to_string()),
                total_cents: ActiveValue::Set(invoice.total_cents + amount_cents),
                ..Default::default()
            };
            patch.update(&db_tx).await?;
            self.credit_card_limit(&db_tx, card_id, -amount_cents)
                .await?;

            let model = self
                .require_invoice_on_card(&db_tx, invoice_id, card_id, user_id)
                .await?;
            Invoice::try_from(model)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_clamped_to_short_month() {
        let february: Month = "2025-02".parse().unwrap();
        assert_eq!(
            day_in_month(&february, 31),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            day_in_month(&february, 10),
            NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()
        );
    }
}
