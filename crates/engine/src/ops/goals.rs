//! Goal CRUD and history.

use sea_orm::{ActiveValue, QueryFilter, QueryOrder, Statement, TransactionTrait, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Contribution, EngineError, Goal, GoalStatus, NewGoalCmd, ResultEngine, UpdateGoalCmd,
    contributions, goals,
};

use super::{Engine, apply_text_patch, normalize_required_name, with_tx};

/// Aggregated goal counters for one user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalSummary {
    pub total: i64,
    pub active: i64,
    pub completed: i64,
    /// Sum of targets over active goals.
    pub active_target_cents: i64,
    /// Sum of balances over active goals.
    pub active_saved_cents: i64,
}

impl Engine {
    /// Register a new savings goal.
    pub async fn create_goal(&self, cmd: NewGoalCmd) -> ResultEngine<Goal> {
        let name = normalize_required_name(&cmd.name, "goal")?;
        with_tx!(self, |db_tx| {
            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, &cmd.user_id)
                    .await?;
            }
            let goal = Goal::new(
                &cmd.user_id,
                name,
                cmd.description.clone(),
                cmd.target_cents,
                cmd.due_on,
                cmd.priority,
                cmd.envelope_id,
            )?;
            goals::ActiveModel::from(&goal).insert(&db_tx).await?;
            Ok(goal)
        })
    }

    /// The user's goals, optionally filtered by status, highest priority
    /// first.
    pub async fn list_goals(
        &self,
        user_id: &str,
        status: Option<GoalStatus>,
    ) -> ResultEngine<Vec<Goal>> {
        let mut query = goals::Entity::find()
            .filter(goals::Column::UserId.eq(user_id))
            .order_by_desc(goals::Column::Priority)
            .order_by_asc(goals::Column::DueOn);
        if let Some(status) = status {
            query = query.filter(goals::Column::Status.eq(status.as_str()));
        }
        query
            .all(&self.database)
            .await?
            .into_iter()
            .map(Goal::try_from)
            .collect()
    }

    /// Patch goal metadata. The balance and status only move through
    /// contributions.
    pub async fn update_goal(
        &self,
        user_id: &str,
        goal_id: Uuid,
        cmd: UpdateGoalCmd,
    ) -> ResultEngine<Goal> {
        with_tx!(self, |db_tx| {
            let model = self.require_goal(&db_tx, goal_id, user_id).await?;
            let goal = Goal::try_from(model)?;

            let name = match cmd.name.as_deref() {
                Some(value) => normalize_required_name(value, "goal")?,
                None => goal.name.clone(),
            };
            let target_cents = cmd.target_cents.unwrap_or(goal.target_cents);
            if target_cents <= 0 {
                return Err(EngineError::InvalidInput(
                    "target_cents must be > 0".to_string(),
                ));
            }
            let priority = cmd.priority.unwrap_or(goal.priority);
            if !(1..=5).contains(&priority) {
                return Err(EngineError::InvalidInput(format!(
                    "priority must be between 1 and 5, got {priority}"
                )));
            }
            if let Some(envelope_id) = cmd.envelope_id {
                self.require_envelope(&db_tx, envelope_id, user_id).await?;
            }

            let patch = goals::ActiveModel {
                id: ActiveValue::Set(goal_id.to_string()),
                name: ActiveValue::Set(name),
                description: ActiveValue::Set(apply_text_patch(
                    goal.description.clone(),
                    cmd.description.as_deref(),
                )),
                target_cents: ActiveValue::Set(target_cents),
                due_on: ActiveValue::Set(cmd.due_on.or(goal.due_on)),
                priority: ActiveValue::Set(priority),
                envelope_id: ActiveValue::Set(
                    cmd.envelope_id.or(goal.envelope_id).map(|id| id.to_string()),
                ),
                ..Default::default()
            };
            patch.update(&db_tx).await?;

            let model = self.require_goal(&db_tx, goal_id, user_id).await?;
            Goal::try_from(model)
        })
    }

    /// Delete a goal; its contribution history cascades away with it.
    pub async fn delete_goal(&self, user_id: &str, goal_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_goal(&db_tx, goal_id, user_id).await?;
            contributions::Entity::delete_many()
                .filter(contributions::Column::GoalId.eq(goal_id.to_string()))
                .exec(&db_tx)
                .await?;
            goals::Entity::delete_by_id(goal_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// A goal's contributions, newest first.
    pub async fn list_contributions(
        &self,
        user_id: &str,
        goal_id: Uuid,
    ) -> ResultEngine<Vec<Contribution>> {
        with_tx!(self, |db_tx| {
            self.require_goal(&db_tx, goal_id, user_id).await?;
            contributions::Entity::find()
                .filter(contributions::Column::GoalId.eq(goal_id.to_string()))
                .order_by_desc(contributions::Column::ContributedOn)
                .all(&db_tx)
                .await?
                .into_iter()
                .map(Contribution::try_from)
                .collect()
        })
    }

    /// Aggregated goal counters for the user.
    pub async fn goal_summary(&self, user_id: &str) -> ResultEngine<GoalSummary> {
        let backend = self.database.get_database_backend();
        let stmt = Statement::from_sql_and_values(
            backend,
            "SELECT \
               COUNT(*) AS total, \
               COALESCE(SUM(CASE WHEN status = 'active' THEN 1 ELSE 0 END), 0) AS active, \
               COALESCE(SUM(CASE WHEN status = 'completed' THEN 1 ELSE 0 END), 0) AS completed, \
               COALESCE(SUM(CASE WHEN status = 'active' THEN target_cents ELSE 0 END), 0) AS active_target, \
               COALESCE(SUM(CASE WHEN status = 'active' THEN current_cents ELSE 0 END), 0) AS active_saved \
             FROM goals WHERE user_id = ?",
            vec![user_id.into()],
        );
        let row = self.database.query_one(stmt).await?;
        let get = |name: &str| -> i64 {
            row.as_ref()
                .and_then(|r| r.try_get("", name).ok())
                .unwrap_or(0)
        };
        Ok(GoalSummary {
            total: get("total"),
            active: get("active"),
            completed: get("completed"),
            active_target_cents: get("active_target"),
            active_saved_cents: get("active_saved"),
        })
    }
}
