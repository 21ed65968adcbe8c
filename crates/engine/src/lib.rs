//! Core engine for the cofrinho budget tracker.
//!
//! The engine owns the envelope-allocation and balance-propagation logic:
//! distributing incomes over percentage-weighted monthly envelopes, debiting
//! envelopes for expenses and settlements (debt amortizations, goal
//! contributions, invoice payments, wishlist purchases), and reversing those
//! effects when a transaction is edited or deleted. Every write operation
//! runs inside one database transaction; partial updates are never visible.
//!
//! The HTTP layer authenticates the caller and hands the engine a `user_id`;
//! the engine re-checks that every row it touches belongs to that user and
//! reports foreign rows as plain not-found.

pub use accounts::Account;
pub use amortizations::Amortization;
pub use cards::Card;
pub use commands::{
    AmortizeDebtCmd, ConfigureEnvelopesCmd, ContributeToGoalCmd, CreateTransactionCmd,
    EnvelopeTarget, NewCardCmd, NewDebtCmd, NewGoalCmd, NewRecurringItemCmd, NewWishlistItemCmd,
    PayInvoiceCmd, PurchaseWishlistItemCmd, UpdateGoalCmd, UpdateRecurringItemCmd,
    UpdateTransactionCmd, UpdateWishlistItemCmd,
};
pub use contributions::Contribution;
pub use debts::{Debt, DebtStatus};
pub use envelopes::Envelope;
pub use error::EngineError;
pub use goals::{Goal, GoalStatus};
pub use invoices::{Invoice, InvoiceStatus};
pub use month::Month;
pub use ops::{DebtSummary, Engine, EngineBuilder, GoalSummary, MonthlySummary, TransactionListFilter};
pub use recurring::{Frequency, RecurringItem};
pub use transactions::{Transaction, TransactionKind};
pub use wishlist::{WishlistItem, WishlistStatus};

pub mod accounts;
pub mod amortizations;
pub mod cards;
mod commands;
pub mod contributions;
pub mod debts;
pub mod envelopes;
mod error;
pub mod goals;
pub mod invoices;
mod month;
mod ops;
pub mod recurring;
pub mod transactions;
pub mod users;
pub mod wishlist;

type ResultEngine<T> = Result<T, EngineError>;
