//! Envelope store: configuration, listing, deletion.

use sea_orm::sea_query::Expr;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    ConfigureEnvelopesCmd, Envelope, EngineError, Month, ResultEngine, debts, envelopes, goals,
    recurring, transactions, wishlist,
};

use super::{Engine, normalize_required_name, with_tx};

impl Engine {
    /// Bulk-upsert the envelope set for one month, keyed on
    /// (user, name, month).
    ///
    /// Existing envelopes only get their `target_percent` overwritten;
    /// `allocated`/`spent` survive reconfiguration. New envelopes start at
    /// zero. Percentages are range-checked individually but the set is NOT
    /// required to sum to 100; allocation always uses whatever is stored
    /// (see DESIGN.md).
    pub async fn configure_envelopes(
        &self,
        cmd: ConfigureEnvelopesCmd,
    ) -> ResultEngine<Vec<Envelope>> {
        if cmd.targets.is_empty() {
            return Err(EngineError::InvalidInput(
                "at least one envelope target is required".to_string(),
            ));
        }
        let mut targets = Vec::with_capacity(cmd.targets.len());
        for target in &cmd.targets {
            let name = normalize_required_name(&target.name, "envelope")?;
            if !(0..=100).contains(&target.target_percent) {
                return Err(EngineError::InvalidInput(format!(
                    "target percent must be between 0 and 100, got {}",
                    target.target_percent
                )));
            }
            targets.push((name, target.target_percent));
        }

        with_tx!(self, |db_tx| {
            for (name, target_percent) in targets {
                let existing = envelopes::Entity::find()
                    .filter(envelopes::Column::UserId.eq(cmd.user_id.as_str()))
                    .filter(envelopes::Column::Name.eq(name.as_str()))
                    .filter(envelopes::Column::Month.eq(cmd.month.as_str()))
                    .one(&db_tx)
                    .await?;

                match existing {
                    Some(model) => {
                        let patch = envelopes::ActiveModel {
                            id: ActiveValue::Set(model.id),
                            target_percent: ActiveValue::Set(target_percent),
                            ..Default::default()
                        };
                        patch.update(&db_tx).await?;
                    }
                    None => {
                        let envelope = Envelope::new(
                            &cmd.user_id,
                            name,
                            cmd.month.clone(),
                            target_percent,
                        )?;
                        envelopes::ActiveModel::from(&envelope).insert(&db_tx).await?;
                    }
                }
            }

            self.envelope_set(&db_tx, &cmd.user_id, &cmd.month).await
        })
    }

    /// Every envelope for the user and month, ordered by name. Empty when
    /// the month is not configured yet.
    pub async fn list_envelopes(
        &self,
        user_id: &str,
        month: &Month,
    ) -> ResultEngine<Vec<Envelope>> {
        with_tx!(self, |db_tx| {
            self.envelope_set(&db_tx, user_id, month).await
        })
    }

    /// Delete an envelope together with its linked transactions.
    ///
    /// Debts, goals, recurring items and wishlist entries that referenced
    /// the envelope are kept and merely unlinked.
    pub async fn delete_envelope(&self, user_id: &str, envelope_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_envelope(&db_tx, envelope_id, user_id).await?;
            let id = envelope_id.to_string();

            transactions::Entity::delete_many()
                .filter(transactions::Column::EnvelopeId.eq(id.as_str()))
                .exec(&db_tx)
                .await?;

            debts::Entity::update_many()
                .col_expr(debts::Column::EnvelopeId, Expr::value(Option::<String>::None))
                .filter(debts::Column::EnvelopeId.eq(id.as_str()))
                .exec(&db_tx)
                .await?;
            goals::Entity::update_many()
                .col_expr(goals::Column::EnvelopeId, Expr::value(Option::<String>::None))
                .filter(goals::Column::EnvelopeId.eq(id.as_str()))
                .exec(&db_tx)
                .await?;
            recurring::Entity::update_many()
                .col_expr(
                    recurring::Column::EnvelopeId,
                    Expr::value(Option::<String>::None),
                )
                .filter(recurring::Column::EnvelopeId.eq(id.as_str()))
                .exec(&db_tx)
                .await?;
            wishlist::Entity::update_many()
                .col_expr(
                    wishlist::Column::EnvelopeId,
                    Expr::value(Option::<String>::None),
                )
                .filter(wishlist::Column::EnvelopeId.eq(id.as_str()))
                .exec(&db_tx)
                .await?;

            envelopes::Entity::delete_by_id(id).exec(&db_tx).await?;
            Ok(())
        })
    }
}
