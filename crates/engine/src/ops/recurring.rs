//! Recurring item CRUD. The engine never materializes these into
//! transactions on its own; clients do, through the normal create path.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, NewRecurringItemCmd, RecurringItem, ResultEngine, UpdateRecurringItemCmd,
    recurring,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Register a new recurring item.
    pub async fn create_recurring_item(
        &self,
        cmd: NewRecurringItemCmd,
    ) -> ResultEngine<RecurringItem> {
        let description = normalize_required_name(&cmd.description, "recurring item")?;
        with_tx!(self, |db_tx| {
            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, &cmd.user_id)
                    .await?;
            }
            let item = RecurringItem::new(
                &cmd.user_id,
                cmd.kind,
                cmd.amount_cents,
                description,
                cmd.due_day,
                cmd.frequency,
                cmd.envelope_id,
            )?;
            recurring::ActiveModel::from(&item).insert(&db_tx).await?;
            Ok(item)
        })
    }

    /// The user's recurring items ordered by due day.
    pub async fn list_recurring_items(&self, user_id: &str) -> ResultEngine<Vec<RecurringItem>> {
        recurring::Entity::find()
            .filter(recurring::Column::UserId.eq(user_id))
            .order_by_asc(recurring::Column::DueDay)
            .all(&self.database)
            .await?
            .into_iter()
            .map(RecurringItem::try_from)
            .collect()
    }

    /// Patch recurring item fields.
    pub async fn update_recurring_item(
        &self,
        user_id: &str,
        item_id: Uuid,
        cmd: UpdateRecurringItemCmd,
    ) -> ResultEngine<RecurringItem> {
        with_tx!(self, |db_tx| {
            let model = self.require_recurring_item(&db_tx, item_id, user_id).await?;
            let item = RecurringItem::try_from(model)?;

            let amount_cents = cmd.amount_cents.unwrap_or(item.amount_cents);
            if amount_cents <= 0 {
                return Err(EngineError::InvalidInput(
                    "amount_cents must be > 0".to_string(),
                ));
            }
            let due_day = cmd.due_day.unwrap_or(item.due_day);
            if !(1..=31).contains(&due_day) {
                return Err(EngineError::InvalidInput(format!(
                    "due_day must be between 1 and 31, got {due_day}"
                )));
            }
            let description = match cmd.description.as_deref() {
                Some(value) => normalize_required_name(value, "recurring item")?,
                None => item.description.clone(),
            };
            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, user_id).await?;
            }

            let patch = recurring::ActiveModel {
                id: ActiveValue::Set(item_id.to_string()),
                amount_cents: ActiveValue::Set(amount_cents),
                description: ActiveValue::Set(description),
                due_day: ActiveValue::Set(due_day),
                frequency: ActiveValue::Set(
                    cmd.frequency.unwrap_or(item.frequency).as_str().to_string(),
                ),
                active: ActiveValue::Set(cmd.active.unwrap_or(item.active)),
                envelope_id: ActiveValue::Set(
                    cmd.envelope_id.or(item.envelope_id).map(|id| id.to_string()),
                ),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            let model = self.require_recurring_item(&db_tx, item_id, user_id).await?;
            RecurringItem::try_from(model)
        })
    }

    pub async fn delete_recurring_item(&self, user_id: &str, item_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_recurring_item(&db_tx, item_id, user_id).await?;
            recurring::Entity::delete_by_id(item_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
