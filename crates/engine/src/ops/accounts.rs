//! Bank account CRUD.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{Account, ResultEngine, accounts};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a new account with an opening balance.
    pub async fn create_account(
        &self,
        user_id: &str,
        name: &str,
        kind: &str,
        initial_cents: i64,
    ) -> ResultEngine<Account> {
        let name = normalize_required_name(name, "account")?;
        let kind = normalize_required_name(kind, "account kind")?;
        with_tx!(self, |db_tx| {
            let account = Account::new(user_id, name, kind, initial_cents);
            accounts::ActiveModel::from(&account).insert(&db_tx).await?;
            Ok(account)
        })
    }

    /// The user's accounts ordered by name.
    pub async fn list_accounts(&self, user_id: &str) -> ResultEngine<Vec<Account>> {
        accounts::Entity::find()
            .filter(accounts::Column::UserId.eq(user_id))
            .order_by_asc(accounts::Column::Name)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    /// Rename an account or relabel its kind.
    pub async fn update_account(
        &self,
        user_id: &str,
        account_id: Uuid,
        name: Option<&str>,
        kind: Option<&str>,
    ) -> ResultEngine<Account> {
        with_tx!(self, |db_tx| {
            let model = self.require_account(&db_tx, account_id, user_id).await?;
            let account = Account::try_from(model)?;
            let name = match name {
                Some(value) => normalize_required_name(value, "account")?,
                None => account.name.clone(),
            };
            let kind = match kind {
                Some(value) => normalize_required_name(value, "account kind")?,
                None => account.kind.clone(),
            };
            let patch = accounts::ActiveModel {
                id: ActiveValue::Set(account_id.to_string()),
                name: ActiveValue::Set(name),
                kind: ActiveValue::Set(kind),
                ..Default::default()
            };
            patch.update(&db_tx).await?;
            let model = self.require_account(&db_tx, account_id, user_id).await?;
            Account::try_from(model)
        })
    }

    pub async fn delete_account(&self, user_id: &str, account_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_account(&db_tx, account_id, user_id).await?;
            accounts::Entity::delete_by_id(account_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Consolidated balance over all accounts.
    pub async fn total_account_balance(&self, user_id: &str) -> ResultEngine<i64> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT COALESCE(SUM(balance_cents), 0) AS total FROM accounts WHERE user_id = ?",
            vec![user_id.into()],
        );
        let row = self.database.query_one(stmt).await?;
        Ok(row.and_then(|r| r.try_get("", "total").ok()).unwrap_or(0))
    }
}
