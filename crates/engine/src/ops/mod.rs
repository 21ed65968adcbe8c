use sea_orm::DatabaseConnection;

use crate::{EngineError, ResultEngine};

mod access;
mod accounts;
mod allocation;
mod cards;
mod debts;
mod envelopes;
mod goals;
mod recurring;
mod settlements;
mod spending;
mod transactions;
mod wishlist;

pub use debts::DebtSummary;
pub use goals::GoalSummary;
pub use transactions::{MonthlySummary, TransactionListFilter};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// The engine holds the injected database handle; one transaction is opened
/// per operation and released on every exit path.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Patch semantics for optional text columns: `None` keeps the stored value,
/// a blank string clears it.
fn apply_text_patch(current: Option<String>, patch: Option<&str>) -> Option<String> {
    match patch {
        None => current,
        Some(value) => normalize_optional_text(Some(value)),
    }
}

fn require_positive(amount_cents: i64, label: &str) -> ResultEngine<()> {
    if amount_cents <= 0 {
        return Err(EngineError::InvalidInput(format!(
            "{label} must be > 0, got {amount_cents}"
        )));
    }
    Ok(())
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_patch_keeps_clears_and_sets() {
        assert_eq!(
            apply_text_patch(Some("old".to_string()), None),
            Some("old".to_string())
        );
        assert_eq!(apply_text_patch(Some("old".to_string()), Some("  ")), None);
        assert_eq!(
            apply_text_patch(None, Some(" new ")),
            Some("new".to_string())
        );
    }

    #[test]
    fn positive_amount_guard() {
        assert!(require_positive(1, "amount").is_ok());
        assert!(require_positive(0, "amount").is_err());
        assert!(require_positive(-5, "amount").is_err());
    }
}
