//! Command structs for engine operations.
//!
//! These types group parameters for write operations, keeping call sites
//! readable and avoiding long argument lists. Every command carries the
//! `user_id` the HTTP layer authenticated; the engine re-checks ownership of
//! every referenced row against it.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{Frequency, Month, TransactionKind};

/// One envelope target inside a configuration request.
#[derive(Clone, Debug)]
pub struct EnvelopeTarget {
    pub name: String,
    pub target_percent: i32,
}

/// Bulk-upsert the envelope set for one month.
#[derive(Clone, Debug)]
pub struct ConfigureEnvelopesCmd {
    pub user_id: String,
    pub month: Month,
    pub targets: Vec<EnvelopeTarget>,
}

/// Create an income or expense transaction.
#[derive(Clone, Debug)]
pub struct CreateTransactionCmd {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub occurred_on: NaiveDate,
    pub description: Option<String>,
    /// Required for expenses, ignored for incomes.
    pub envelope_id: Option<Uuid>,
}

impl CreateTransactionCmd {
    #[must_use]
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount_cents: i64,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount_cents,
            occurred_on,
            description: None,
            envelope_id: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn envelope_id(mut self, envelope_id: Uuid) -> Self {
        self.envelope_id = Some(envelope_id);
        self
    }
}

/// Update an existing transaction. `None` fields keep the stored value.
#[derive(Clone, Debug)]
pub struct UpdateTransactionCmd {
    pub user_id: String,
    pub transaction_id: Uuid,
    pub kind: Option<TransactionKind>,
    pub amount_cents: Option<i64>,
    pub occurred_on: Option<NaiveDate>,
    pub description: Option<String>,
    pub envelope_id: Option<Uuid>,
}

impl UpdateTransactionCmd {
    #[must_use]
    pub fn new(user_id: impl Into<String>, transaction_id: Uuid) -> Self {
        Self {
            user_id: user_id.into(),
            transaction_id,
            kind: None,
            amount_cents: None,
            occurred_on: None,
            description: None,
            envelope_id: None,
        }
    }

    #[must_use]
    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn amount_cents(mut self, amount_cents: i64) -> Self {
        self.amount_cents = Some(amount_cents);
        self
    }

    #[must_use]
    pub fn occurred_on(mut self, occurred_on: NaiveDate) -> Self {
        self.occurred_on = Some(occurred_on);
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn envelope_id(mut self, envelope_id: Uuid) -> Self {
        self.envelope_id = Some(envelope_id);
        self
    }
}

/// Register a new debt. The current balance starts at the original amount.
#[derive(Clone, Debug)]
pub struct NewDebtCmd {
    pub user_id: String,
    pub description: String,
    pub original_cents: i64,
    pub monthly_interest_bps: i32,
    pub started_on: NaiveDate,
    pub envelope_id: Option<Uuid>,
}

/// Amortize a debt from an envelope.
#[derive(Clone, Debug)]
pub struct AmortizeDebtCmd {
    pub user_id: String,
    pub debt_id: Uuid,
    pub envelope_id: Uuid,
    pub amount_cents: i64,
    pub paid_on: NaiveDate,
    pub note: Option<String>,
}

/// Register a new savings goal.
#[derive(Clone, Debug)]
pub struct NewGoalCmd {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub target_cents: i64,
    pub due_on: Option<NaiveDate>,
    pub priority: i32,
    pub envelope_id: Option<Uuid>,
}

/// Patch goal metadata. `None` fields keep the stored value; the balance and
/// status are only ever moved by contributions.
#[derive(Clone, Debug, Default)]
pub struct UpdateGoalCmd {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_cents: Option<i64>,
    pub due_on: Option<NaiveDate>,
    pub priority: Option<i32>,
    pub envelope_id: Option<Uuid>,
}

/// Contribute toward a goal, optionally funded from an envelope.
#[derive(Clone, Debug)]
pub struct ContributeToGoalCmd {
    pub user_id: String,
    pub goal_id: Uuid,
    pub amount_cents: i64,
    pub contributed_on: NaiveDate,
    pub envelope_id: Option<Uuid>,
    pub note: Option<String>,
}

/// Register a new credit card.
#[derive(Clone, Debug)]
pub struct NewCardCmd {
    pub user_id: String,
    pub name: String,
    pub brand: Option<String>,
    pub limit_cents: i64,
    pub closing_day: i32,
    pub due_day: i32,
}

/// Pay (part of) a card invoice from a bank account.
#[derive(Clone, Debug)]
pub struct PayInvoiceCmd {
    pub user_id: String,
    pub card_id: Uuid,
    pub invoice_id: Uuid,
    pub account_id: Uuid,
    pub amount_cents: i64,
    pub paid_on: NaiveDate,
}

/// Register a new wishlist item.
#[derive(Clone, Debug)]
pub struct NewWishlistItemCmd {
    pub user_id: String,
    pub description: String,
    pub estimated_cents: i64,
    pub monthly_contribution_cents: i64,
    pub envelope_id: Option<Uuid>,
}

/// Patch wishlist item fields. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct UpdateWishlistItemCmd {
    pub description: Option<String>,
    pub estimated_cents: Option<i64>,
    pub monthly_contribution_cents: Option<i64>,
    pub envelope_id: Option<Uuid>,
}

/// Mark a wishlist item as bought.
#[derive(Clone, Debug)]
pub struct PurchaseWishlistItemCmd {
    pub user_id: String,
    pub item_id: Uuid,
    /// Envelope to debit; when absent the purchase is recorded without
    /// touching balances.
    pub envelope_id: Option<Uuid>,
    /// Actual price paid; falls back to the stored estimate.
    pub actual_cents: Option<i64>,
    pub purchased_on: NaiveDate,
}

/// Register a new recurring item.
#[derive(Clone, Debug)]
pub struct NewRecurringItemCmd {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount_cents: i64,
    pub description: String,
    pub due_day: i32,
    pub frequency: Frequency,
    pub envelope_id: Option<Uuid>,
}

/// Patch recurring item fields. `None` keeps the stored value.
#[derive(Clone, Debug, Default)]
pub struct UpdateRecurringItemCmd {
    pub amount_cents: Option<i64>,
    pub description: Option<String>,
    pub due_day: Option<i32>,
    pub frequency: Option<Frequency>,
    pub active: Option<bool>,
    pub envelope_id: Option<Uuid>,
}
