//! Request and response shapes shared by the server and its clients.
//!
//! Monetary fields are integer cents; months are `YYYY-MM` strings validated
//! by the engine; dates are plain ISO dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod envelope {
    use super::*;

    /// One envelope target inside a configuration request.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EnvelopeTarget {
        pub name: String,
        /// Whole percent, 0-100.
        pub target_percent: i32,
    }

    /// Bulk-upsert the envelope set for a month.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct EnvelopeConfigure {
        /// `YYYY-MM`; defaults to the current month.
        pub month: Option<String>,
        pub envelopes: Vec<EnvelopeTarget>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EnvelopeList {
        pub month: Option<String>,
    }

    /// Distribute an income amount over a month's envelopes without
    /// recording a transaction.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Distribute {
        pub amount_cents: i64,
        pub month: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EnvelopeView {
        pub id: Uuid,
        pub name: String,
        pub month: String,
        pub target_percent: i32,
        pub allocated_cents: i64,
        pub spent_cents: i64,
        /// `allocated - spent`; negative means overspent.
        pub available_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct EnvelopesResponse {
        pub envelopes: Vec<EnvelopeView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub amount_cents: i64,
        pub occurred_on: NaiveDate,
        pub description: Option<String>,
        /// Required for expenses.
        pub envelope_id: Option<Uuid>,
    }

    /// Patch an existing transaction. Absent fields keep stored values.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub kind: Option<TransactionKind>,
        pub amount_cents: Option<i64>,
        pub occurred_on: Option<NaiveDate>,
        pub description: Option<String>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionList {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub kind: Option<TransactionKind>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_cents: i64,
        pub occurred_on: NaiveDate,
        pub description: Option<String>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionsResponse {
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummary {
        pub month: String,
        pub total_income_cents: i64,
        pub total_expense_cents: i64,
        pub net_cents: i64,
        pub income_count: i64,
        pub expense_count: i64,
    }
}

pub mod debt {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DebtStatus {
        Pending,
        Negotiating,
        Settled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtNew {
        pub description: String,
        pub original_cents: i64,
        /// Basis points; informational only.
        pub monthly_interest_bps: Option<i32>,
        pub started_on: NaiveDate,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtStatusUpdate {
        pub status: DebtStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Amortize {
        pub envelope_id: Uuid,
        pub amount_cents: i64,
        pub paid_on: NaiveDate,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub id: Uuid,
        pub description: String,
        pub original_cents: i64,
        pub current_cents: i64,
        pub monthly_interest_bps: i32,
        pub status: DebtStatus,
        pub started_on: NaiveDate,
        pub settled_on: Option<NaiveDate>,
        pub envelope_id: Option<Uuid>,
        pub paid_percent: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtsResponse {
        pub debts: Vec<DebtView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AmortizationView {
        pub id: Uuid,
        pub envelope_id: Uuid,
        pub amount_cents: i64,
        pub paid_on: NaiveDate,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AmortizationsResponse {
        pub amortizations: Vec<AmortizationView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtSummary {
        pub total: i64,
        pub pending: i64,
        pub negotiating: i64,
        pub settled: i64,
        pub total_owed_cents: i64,
        pub total_original_cents: i64,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GoalStatus {
        Active,
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub description: Option<String>,
        pub target_cents: i64,
        pub due_on: Option<NaiveDate>,
        /// 1-5, defaults to 1.
        pub priority: Option<i32>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub target_cents: Option<i64>,
        pub due_on: Option<NaiveDate>,
        pub priority: Option<i32>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Contribute {
        pub amount_cents: i64,
        pub contributed_on: NaiveDate,
        pub envelope_id: Option<Uuid>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub target_cents: i64,
        pub current_cents: i64,
        pub status: GoalStatus,
        pub due_on: Option<NaiveDate>,
        pub priority: i32,
        pub envelope_id: Option<Uuid>,
        /// May exceed 100 once over-contributed.
        pub progress_percent: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalsResponse {
        pub goals: Vec<GoalView>,
    }

    /// Returned by the contribute endpoint with a user-facing message.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionResult {
        pub message: String,
        pub goal: GoalView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionView {
        pub id: Uuid,
        pub amount_cents: i64,
        pub contributed_on: NaiveDate,
        pub envelope_id: Option<Uuid>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionsResponse {
        pub contributions: Vec<ContributionView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalSummary {
        pub total: i64,
        pub active: i64,
        pub completed: i64,
        pub active_target_cents: i64,
        pub active_saved_cents: i64,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub kind: String,
        pub initial_cents: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountUpdate {
        pub name: Option<String>,
        pub kind: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: Uuid,
        pub name: String,
        pub kind: String,
        pub balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        pub accounts: Vec<AccountView>,
        pub total_balance_cents: i64,
    }
}

pub mod card {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvoiceStatus {
        Open,
        Closed,
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardNew {
        pub name: String,
        pub brand: Option<String>,
        pub limit_cents: i64,
        pub closing_day: i32,
        pub due_day: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardActiveUpdate {
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardView {
        pub id: Uuid,
        pub name: String,
        pub brand: Option<String>,
        pub limit_cents: i64,
        pub available_limit_cents: i64,
        pub closing_day: i32,
        pub due_day: i32,
        pub active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CardsResponse {
        pub cards: Vec<CardView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceCharge {
        pub amount_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoicePay {
        pub account_id: Uuid,
        pub amount_cents: i64,
        pub paid_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoiceView {
        pub id: Uuid,
        pub card_id: Uuid,
        pub month: String,
        pub total_cents: i64,
        pub status: InvoiceStatus,
        pub closes_on: NaiveDate,
        pub due_on: NaiveDate,
        pub paid_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvoicesResponse {
        pub invoices: Vec<InvoiceView>,
    }
}

pub mod wishlist {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum WishlistStatus {
        Wanting,
        Saving,
        Bought,
        Cancelled,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistItemNew {
        pub description: String,
        pub estimated_cents: i64,
        pub monthly_contribution_cents: Option<i64>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistItemUpdate {
        pub description: Option<String>,
        pub estimated_cents: Option<i64>,
        pub monthly_contribution_cents: Option<i64>,
        pub envelope_id: Option<Uuid>,
        /// wanting/saving/cancelled; buying goes through the purchase
        /// endpoint.
        pub status: Option<WishlistStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Purchase {
        pub envelope_id: Option<Uuid>,
        /// Actual price; falls back to the stored estimate.
        pub actual_cents: Option<i64>,
        pub purchased_on: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistItemView {
        pub id: Uuid,
        pub description: String,
        pub estimated_cents: i64,
        pub monthly_contribution_cents: i64,
        pub status: WishlistStatus,
        pub envelope_id: Option<Uuid>,
        /// Projection from the stored monthly contribution; absent when no
        /// contribution is planned.
        pub months_to_purchase: Option<i64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WishlistResponse {
        pub items: Vec<WishlistItemView>,
    }
}

pub mod recurring {
    use super::*;
    use super::transaction::TransactionKind;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Frequency {
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringItemNew {
        pub kind: TransactionKind,
        pub amount_cents: i64,
        pub description: String,
        pub due_day: i32,
        pub frequency: Option<Frequency>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringItemUpdate {
        pub amount_cents: Option<i64>,
        pub description: Option<String>,
        pub due_day: Option<i32>,
        pub frequency: Option<Frequency>,
        pub active: Option<bool>,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringItemView {
        pub id: Uuid,
        pub kind: TransactionKind,
        pub amount_cents: i64,
        pub description: String,
        pub due_day: i32,
        pub frequency: Frequency,
        pub active: bool,
        pub envelope_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringResponse {
        pub items: Vec<RecurringItemView>,
    }
}
