//! Goal API endpoints

use api_types::goal::{
    Contribute, ContributionResult, ContributionView, ContributionsResponse, GoalNew,
    GoalStatus as ApiStatus, GoalSummary, GoalUpdate, GoalView, GoalsResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::{ContributeToGoalCmd, Goal, GoalStatus, NewGoalCmd, UpdateGoalCmd, users};

fn map_status(status: GoalStatus) -> ApiStatus {
    match status {
        GoalStatus::Active => ApiStatus::Active,
        GoalStatus::Completed => ApiStatus::Completed,
    }
}

fn map_goal(goal: Goal) -> GoalView {
    let progress_percent = goal.progress_percent();
    GoalView {
        id: goal.id,
        name: goal.name,
        description: goal.description,
        target_cents: goal.target_cents,
        current_cents: goal.current_cents,
        status: map_status(goal.status),
        due_on: goal.due_on,
        priority: goal.priority,
        envelope_id: goal.envelope_id,
        progress_percent,
    }
}

#[derive(Deserialize)]
pub struct GoalListQuery {
    status: Option<ApiStatus>,
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Query(payload): Query<GoalListQuery>,
) -> Result<Json<GoalsResponse>, ServerError> {
    let status = payload.status.map(|status| match status {
        ApiStatus::Active => GoalStatus::Active,
        ApiStatus::Completed => GoalStatus::Completed,
    });
    let goals = state.engine.list_goals(&user.username, status).await?;
    Ok(Json(GoalsResponse {
        goals: goals.into_iter().map(map_goal).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .create_goal(NewGoalCmd {
            user_id: user.username.clone(),
            name: payload.name,
            description: payload.description,
            target_cents: payload.target_cents,
            due_on: payload.due_on,
            priority: payload.priority.unwrap_or(1),
            envelope_id: payload.envelope_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_goal(goal))))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state
        .engine
        .update_goal(
            &user.username,
            id,
            UpdateGoalCmd {
                name: payload.name,
                description: payload.description,
                target_cents: payload.target_cents,
                due_on: payload.due_on,
                priority: payload.priority,
                envelope_id: payload.envelope_id,
            },
        )
        .await?;
    Ok(Json(map_goal(goal)))
}

pub async fn contribute(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Contribute>,
) -> Result<Json<ContributionResult>, ServerError> {
    let goal = state
        .engine
        .contribute_to_goal(ContributeToGoalCmd {
            user_id: user.username.clone(),
            goal_id: id,
            amount_cents: payload.amount_cents,
            contributed_on: payload.contributed_on,
            envelope_id: payload.envelope_id,
            note: payload.note,
        })
        .await?;

    let message = if goal.status == GoalStatus::Completed {
        "Goal completed!".to_string()
    } else {
        "Contribution recorded".to_string()
    };
    Ok(Json(ContributionResult {
        message,
        goal: map_goal(goal),
    }))
}

pub async fn list_contributions(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ContributionsResponse>, ServerError> {
    let contributions = state.engine.list_contributions(&user.username, id).await?;
    Ok(Json(ContributionsResponse {
        contributions: contributions
            .into_iter()
            .map(|c| ContributionView {
                id: c.id,
                amount_cents: c.amount_cents,
                contributed_on: c.contributed_on,
                envelope_id: c.envelope_id,
                note: c.note,
            })
            .collect(),
    }))
}

pub async fn remove(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(&user.username, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn summary(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<GoalSummary>, ServerError> {
    let summary = state.engine.goal_summary(&user.username).await?;
    Ok(Json(GoalSummary {
        total: summary.total,
        active: summary.active,
        completed: summary.completed,
        active_target_cents: summary.active_target_cents,
        active_saved_cents: summary.active_saved_cents,
    }))
}
