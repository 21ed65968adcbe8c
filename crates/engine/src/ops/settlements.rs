//! Cross-entity settlements.
//!
//! A settlement moves money from a source envelope to one target ledger
//! entry (debt, goal, card invoice, or wishlist purchase). Each operation is
//! one database transaction: the target update, the history record and the
//! envelope debit either all commit or none do. Nothing here compensates or
//! retries; a failed transaction leaves every balance untouched.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};

use crate::{
    Amortization, AmortizeDebtCmd, ContributeToGoalCmd, Contribution, Debt, DebtStatus,
    EngineError, Goal, GoalStatus, Invoice, InvoiceStatus, PayInvoiceCmd,
    PurchaseWishlistItemCmd, ResultEngine, Transaction, TransactionKind, WishlistItem,
    WishlistStatus, amortizations, contributions, debts, goals, invoices, transactions, wishlist,
};

use super::{Engine, require_positive, with_tx};

impl Engine {
    /// Amortize a debt from an envelope.
    ///
    /// The debt balance is floored at zero; it settles (status + settlement
    /// date) exactly when the balance reaches zero. Settled debts reject
    /// further amortization.
    pub async fn amortize_debt(&self, cmd: AmortizeDebtCmd) -> ResultEngine<Debt> {
        require_positive(cmd.amount_cents, "amount_cents")?;
        with_tx!(self, |db_tx| {
            let model = self.require_debt(&db_tx, cmd.debt_id, &cmd.user_id).await?;
            let debt = Debt::try_from(model)?;
            if debt.status == DebtStatus::Settled {
                return Err(EngineError::AlreadySettled(debt.description.clone()));
            }
            self.require_envelope(&db_tx, cmd.envelope_id, &cmd.user_id)
                .await?;

            let amortization = Amortization::new(
                cmd.debt_id,
                cmd.envelope_id,
                cmd.amount_cents,
                cmd.paid_on,
                cmd.note.clone(),
            )?;
            amortizations::ActiveModel::from(&amortization)
                .insert(&db_tx)
                .await?;

            let new_current = (debt.current_cents - cmd.amount_cents).max(0);
            let settled = new_current == 0;
            let patch = debts::ActiveModel {
                id: ActiveValue::Set(cmd.debt_id.to_string()),
                current_cents: ActiveValue::Set(new_current),
                status: ActiveValue::Set(if settled {
                    DebtStatus::Settled.as_str().to_string()
                } else {
                    debt.status.as_str().to_string()
                }),
                settled_on: ActiveValue::Set(settled.then_some(cmd.paid_on)),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            self.debit_envelope(&db_tx, cmd.envelope_id, cmd.amount_cents)
                .await?;

            let model = self.require_debt(&db_tx, cmd.debt_id, &cmd.user_id).await?;
            Debt::try_from(model)
        })
    }

    /// Contribute toward a goal, optionally debiting an envelope.
    ///
    /// The goal completes exactly when the balance reaches the target.
    /// Contributions past completion are accepted and keep incrementing.
    pub async fn contribute_to_goal(&self, cmd: ContributeToGoalCmd) -> ResultEngine<Goal> {
        require_positive(cmd.amount_cents, "amount_cents")?;
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, cmd.goal_id, &cmd.user_id).await?;
            let goal = Goal::try_from(model)?;

            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, &cmd.user_id)
                    .await?;
            }

            let contribution = Contribution::new(
                cmd.goal_id,
                cmd.amount_cents,
                cmd.contributed_on,
                cmd.envelope_id,
                cmd.note.clone(),
            )?;
            contributions::ActiveModel::from(&contribution)
                .insert(&db_tx)
                .await?;

            let new_current = goal.current_cents + cmd.amount_cents;
            let status = if new_current >= goal.target_cents {
                GoalStatus::Completed
            } else {
                goal.status
            };
            let patch = goals::ActiveModel {
                id: ActiveValue::Set(cmd.goal_id.to_string()),
                current_cents: ActiveValue::Set(new_current),
                status: ActiveValue::Set(status.as_str().to_string()),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            if let Some(envelope_id) = cmd.envelope_id {
                self.debit_envelope(&db_tx, envelope_id, cmd.amount_cents)
                    .await?;
            }

            let model = self.require_goal(&db_tx, cmd.goal_id, &cmd.user_id).await?;
            Goal::try_from(model)
        })
    }

    /// Pay (part of) a card invoice from a bank account.
    ///
    /// The invoice total is floored at zero and flips to paid when it
    /// reaches zero. The account is debited unconditionally (overdraft is
    /// allowed, like envelope overspend) and the card's available limit is
    /// credited back by the payment.
    pub async fn pay_invoice(&self, cmd: PayInvoiceCmd) -> ResultEngine<Invoice> {
        require_positive(cmd.amount_cents, "amount_cents")?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_invoice_on_card(&db_tx, cmd.invoice_id, cmd.card_id, &cmd.user_id)
                .await?;
            let invoice = Invoice::try_from(model)?;
            self.require_account(&db_tx, cmd.account_id, &cmd.user_id)
                .await?;

            let new_total = (invoice.total_cents - cmd.amount_cents).max(0);
            let paid = new_total == 0;
            let patch = invoices::ActiveModel {
                id: ActiveValue::Set(cmd.invoice_id.to_string()),
                total_cents: ActiveValue::Set(new_total),
                status: ActiveValue::Set(if paid {
                    InvoiceStatus::Paid.as_str().to_string()
                } else {
                    InvoiceStatus::Open.as_str().to_string()
                }),
                paid_on: ActiveValue::Set(paid.then_some(cmd.paid_on).or(invoice.paid_on)),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            self.debit_account(&db_tx, cmd.account_id, cmd.amount_cents)
                .await?;
            self.credit_card_limit(&db_tx, cmd.card_id, cmd.amount_cents)
                .await?;

            let model = self
                .require_invoice_on_card(&db_tx, cmd.invoice_id, cmd.card_id, &cmd.user_id)
                .await?;
            Invoice::try_from(model)
        })
    }

    /// Mark a wishlist item as bought.
    ///
    /// When an envelope is given, the purchase debits it by the actual price
    /// (falling back to the estimate) and records a matching expense
    /// transaction. A bought item cannot be bought again; that would debit
    /// the envelope twice.
    pub async fn purchase_wishlist_item(
        &self,
        cmd: PurchaseWishlistItemCmd,
    ) -> ResultEngine<WishlistItem> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_wishlist_item(&db_tx, cmd.item_id, &cmd.user_id)
                .await?;
            let item = WishlistItem::try_from(model)?;
            if item.status == WishlistStatus::Bought {
                return Err(EngineError::InvalidInput(format!(
                    "\"{}\" is already bought",
                    item.description
                )));
            }

            let amount_cents = cmd.actual_cents.unwrap_or(item.estimated_cents);
            require_positive(amount_cents, "amount_cents")?;

            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, &cmd.user_id)
                    .await?;

                let tx = Transaction::new(
                    cmd.user_id.clone(),
                    TransactionKind::Expense,
                    amount_cents,
                    cmd.purchased_on,
                    Some(item.description.clone()),
                    Some(envelope_id),
                    Utc::now(),
                )?;
                transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

                self.debit_envelope(&db_tx, envelope_id, amount_cents)
                    .await?;
            }

            let patch = wishlist::ActiveModel {
                id: ActiveValue::Set(cmd.item_id.to_string()),
                status: ActiveValue::Set(WishlistStatus::Bought.as_str().to_string()),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            let model = self
                .require_wishlist_item(&db_tx, cmd.item_id, &cmd.user_id)
                .await?;
            WishlistItem::try_from(model)
        })
    }
}
