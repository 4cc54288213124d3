//! Axum route handlers for the card catalog and per-profile skill trees.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::catalog::models::{JobCard, JobTrack};
use crate::errors::AppError;
use crate::profile::models::ProfileView;
use crate::skills::unlock::{unlock, UnlockOutcome};
use crate::skills::{cards_by_track, skill_tree, CardNode};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CardListQuery {
    pub track: Option<JobTrack>,
}

#[derive(Debug, Serialize)]
pub struct CardDetailResponse {
    pub card: JobCard,
    /// Every card needed on the way, this card last.
    pub prerequisite_path: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SkillTreeResponse {
    pub profile_id: i64,
    pub unlocked: usize,
    pub cards: Vec<CardNode>,
}

#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    #[serde(default)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct UnlockResponse {
    pub card_id: String,
    pub outcome: UnlockOutcome,
    pub profile: ProfileView,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/cards?track=
///
/// Raw card definitions. With `track`, only that track, sorted by rank.
pub async fn handle_list_cards(
    State(state): State<AppState>,
    Query(query): Query<CardListQuery>,
) -> Json<Vec<JobCard>> {
    let cards = match query.track {
        Some(track) => cards_by_track(&state.catalog, track).into_iter().cloned().collect(),
        None => state.catalog.cards().to_vec(),
    };
    Json(cards)
}

/// GET /api/cards/:card_id
pub async fn handle_get_card(
    State(state): State<AppState>,
    Path(card_id): Path<String>,
) -> Result<Json<CardDetailResponse>, AppError> {
    let path = state.catalog.card_prerequisite_path(&card_id)?;
    let card = state
        .catalog
        .card(&card_id)
        .ok_or_else(|| AppError::NotFound(format!("Card {card_id} not found")))?;

    Ok(Json(CardDetailResponse {
        card: card.clone(),
        prerequisite_path: path.into_iter().map(|c| c.id.clone()).collect(),
    }))
}

/// GET /api/profiles/:id/skill-tree
pub async fn handle_skill_tree(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<Json<SkillTreeResponse>, AppError> {
    let profile = state
        .profiles
        .get(profile_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))?;

    Ok(Json(SkillTreeResponse {
        profile_id,
        unlocked: profile.unlocked_card_ids.len(),
        cards: skill_tree(&state.catalog, &profile),
    }))
}

/// POST /api/profiles/:id/cards/:card_id/unlock
///
/// Explicit unlock. `force` skips the eligibility check (admin use).
pub async fn handle_unlock_card(
    State(state): State<AppState>,
    Path((profile_id, card_id)): Path<(i64, String)>,
    request: Option<Json<UnlockRequest>>,
) -> Result<Json<UnlockResponse>, AppError> {
    let force = request.map(|Json(r)| r.force).unwrap_or(false);
    let card = state
        .catalog
        .card(&card_id)
        .ok_or_else(|| AppError::NotFound(format!("Card {card_id} not found")))?;

    let (outcome, profile) = state
        .profiles
        .update(profile_id, |profile| {
            unlock(card, profile, force).map(|outcome| (outcome, profile.clone()))
        })
        .await
        .ok_or_else(|| AppError::NotFound(format!("Profile {profile_id} not found")))??;

    Ok(Json(UnlockResponse {
        card_id,
        outcome,
        profile: ProfileView::from(profile),
    }))
}
