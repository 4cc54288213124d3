//! Axum route handlers for the task and quest boards, quest completion and
//! the profile dashboard.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::catalog::models::QuestCategory;
use crate::errors::AppError;
use crate::missions::{daily_tasks, quest_board, quest_view, task_board, QuestView, TaskView};
use crate::profile::models::{ProfileView, UserProfile};
use crate::profile::progression::{complete_quest, QuestOutcome};
use crate::skills::{skill_tree, CardNode};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct TaskBoardQuery {
    pub profile_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct QuestBoardQuery {
    pub profile_id: Option<i64>,
    pub category: Option<QuestCategory>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteQuestRequest {
    pub quest_id: u32,
}

#[derive(Debug, Serialize)]
pub struct CompleteQuestResponse {
    pub outcome: QuestOutcome,
    pub quest: QuestView,
    pub profile: ProfileView,
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub profile: ProfileView,
    pub cards: Vec<CardNode>,
    pub daily_tasks: Vec<TaskView>,
    pub today_completions: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_profile(state: &AppState, profile_id: i64) -> Result<UserProfile, AppError> {
    state
        .profiles
        .get(profile_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))
}

async fn optional_profile(
    state: &AppState,
    profile_id: Option<i64>,
) -> Result<Option<UserProfile>, AppError> {
    match profile_id {
        Some(id) => load_profile(state, id).await.map(Some),
        None => Ok(None),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/tasks?profile_id=
pub async fn handle_list_tasks(
    State(state): State<AppState>,
    Query(query): Query<TaskBoardQuery>,
) -> Result<Json<Vec<TaskView>>, AppError> {
    let profile = optional_profile(&state, query.profile_id).await?;
    let today = Utc::now().date_naive();
    Ok(Json(task_board(&state.catalog, profile.as_ref(), today)))
}

/// GET /api/quests?profile_id=&category=
pub async fn handle_list_quests(
    State(state): State<AppState>,
    Query(query): Query<QuestBoardQuery>,
) -> Result<Json<Vec<QuestView>>, AppError> {
    let profile = optional_profile(&state, query.profile_id).await?;
    Ok(Json(quest_board(
        &state.catalog,
        profile.as_ref(),
        query.category,
        Utc::now(),
    )))
}

/// POST /api/profiles/:id/complete_quest/
///
/// Applies a quest's rewards and starts its cooldown.
pub async fn handle_complete_quest(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(request): Json<CompleteQuestRequest>,
) -> Result<Json<CompleteQuestResponse>, AppError> {
    let quest = state
        .catalog
        .quest(request.quest_id)
        .ok_or_else(|| AppError::NotFound(format!("Quest {} not found", request.quest_id)))?;
    let now = Utc::now();

    let (outcome, profile) = state
        .profiles
        .update(profile_id, |profile| {
            complete_quest(profile, quest, &state.catalog, now)
                .map(|outcome| (outcome, profile.clone()))
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))?
        .map_err(|e| {
            warn!("Profile {profile_id}: {e}");
            e
        })?;

    info!(
        "Profile {} completed quest {} (+{} mastery, next at {})",
        profile_id, quest.id, outcome.reward.mastery_gained, outcome.available_at
    );

    Ok(Json(CompleteQuestResponse {
        quest: quest_view(quest, Some(&profile), now),
        outcome,
        profile: ProfileView::from(profile),
    }))
}

/// GET /api/profiles/:id/dashboard
///
/// Everything the home screen shows in one call.
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<Json<DashboardResponse>, AppError> {
    let profile = load_profile(&state, profile_id).await?;
    let today = Utc::now().date_naive();

    let daily_tasks = daily_tasks(&state.catalog, &profile, today);
    let today_completions = profile
        .completions
        .iter()
        .filter(|c| c.completed_on == today)
        .count();

    Ok(Json(DashboardResponse {
        cards: skill_tree(&state.catalog, &profile),
        daily_tasks,
        today_completions,
        profile: ProfileView::from(profile),
    }))
}
