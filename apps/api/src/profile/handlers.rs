//! Axum route handlers for profiles: progression and salary self-report.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::errors::AppError;
use crate::profile::models::{ProfileView, UserProfile};
use crate::profile::progression::{complete_task, update_salary, TaskOutcome};
use crate::reports::handlers::ReviewRequest;
use crate::reports::proofs::{fetch_proof, profile_proof_key, read_proof_file, StoredProof};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CompleteTaskRequest {
    pub task_id: u32,
}

#[derive(Debug, Serialize)]
pub struct CompleteTaskResponse {
    pub outcome: TaskOutcome,
    pub profile: ProfileView,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSalaryRequest {
    pub current_salary: i64,
    pub current_job_title: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn profile_not_found(profile_id: i64) -> AppError {
    AppError::NotFound(format!("Profile {profile_id} not found"))
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/profiles/:id
pub async fn handle_get_profile(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<Json<ProfileView>, AppError> {
    let profile = state
        .profiles
        .get(profile_id)
        .await
        .ok_or_else(|| profile_not_found(profile_id))?;
    Ok(Json(ProfileView::from(profile)))
}

/// POST /api/profiles/:id/complete_task/
///
/// Applies a task's rewards. Daily tasks count once per calendar day (UTC).
/// Cards that become unlockable are reported, not unlocked.
pub async fn handle_complete_task(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(request): Json<CompleteTaskRequest>,
) -> Result<Json<CompleteTaskResponse>, AppError> {
    let task = state
        .catalog
        .task(request.task_id)
        .ok_or_else(|| AppError::NotFound(format!("Task {} not found", request.task_id)))?;
    let today = Utc::now().date_naive();

    let (outcome, profile) = state
        .profiles
        .update(profile_id, |profile| {
            complete_task(profile, task, &state.catalog, today)
                .map(|outcome| (outcome, profile.clone()))
        })
        .await
        .ok_or_else(|| profile_not_found(profile_id))?
        .map_err(|e| {
            warn!("Profile {profile_id}: {e}");
            e
        })?;

    info!(
        "Profile {} completed task {} (+{} {})",
        profile_id,
        outcome.task_id,
        outcome.reward.stat_gained,
        outcome.reward.stat.as_str()
    );

    Ok(Json(CompleteTaskResponse {
        outcome,
        profile: ProfileView::from(profile),
    }))
}

/// POST /api/profiles/:id/update_salary/
///
/// Records a self-reported salary. Any previous verification is cleared.
pub async fn handle_update_salary(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(request): Json<UpdateSalaryRequest>,
) -> Result<Json<ProfileView>, AppError> {
    if request.current_salary <= 0 {
        return Err(AppError::Validation(
            "current_salary must be positive".to_string(),
        ));
    }
    let job_title = request
        .current_job_title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let profile = state
        .profiles
        .update(profile_id, |profile| {
            update_salary(profile, request.current_salary, job_title);
            profile.clone()
        })
        .await
        .ok_or_else(|| profile_not_found(profile_id))?;

    info!("Profile {profile_id} reported salary {}", request.current_salary);
    Ok(Json(ProfileView::from(profile)))
}

/// POST /api/profiles/:id/upload_salary_proof/
///
/// Stores the proof file and moves the profile's salary verification to Pending.
pub async fn handle_upload_salary_proof(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<ProfileView>, AppError> {
    let current = state
        .profiles
        .get(profile_id)
        .await
        .ok_or_else(|| profile_not_found(profile_id))?;
    if current.current_salary.is_none() {
        return Err(AppError::Conflict(
            "Report a salary before uploading proof".to_string(),
        ));
    }
    // Check the transition before paying for the upload.
    current
        .salary_verification
        .clone()
        .submit_proof(String::new())?;

    let file = read_proof_file(&mut multipart, state.config.max_upload_bytes).await?;
    let key = profile_proof_key(profile_id);
    state.proofs.put(&key, file.body, &file.content_type).await?;

    let profile: UserProfile = state
        .profiles
        .update(profile_id, |profile| {
            profile
                .salary_verification
                .submit_proof(key.clone())
                .map(|_| profile.clone())
        })
        .await
        .ok_or_else(|| profile_not_found(profile_id))??;

    info!("Profile {profile_id} submitted salary proof {key}");
    Ok(Json(ProfileView::from(profile)))
}

/// POST /api/profiles/:id/salary_review
///
/// Admin decision on the profile's pending salary proof. Rejections need a
/// reason.
pub async fn handle_review_salary(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ProfileView>, AppError> {
    let now = Utc::now();
    let profile = state
        .profiles
        .update(profile_id, |profile| {
            profile
                .salary_verification
                .review(request.approve, request.reason.as_deref(), now)
                .map(|_| profile.clone())
        })
        .await
        .ok_or_else(|| profile_not_found(profile_id))??;

    info!(
        "Profile {profile_id} salary reviewed: {}",
        profile.salary_verification.status
    );
    Ok(Json(ProfileView::from(profile)))
}

/// GET /api/profiles/:id/salary_proof
pub async fn handle_get_salary_proof(
    State(state): State<AppState>,
    Path(profile_id): Path<i64>,
) -> Result<StoredProof, AppError> {
    let profile = state
        .profiles
        .get(profile_id)
        .await
        .ok_or_else(|| profile_not_found(profile_id))?;
    fetch_proof(
        state.proofs.as_ref(),
        profile.salary_verification.proof_key.as_deref(),
        &format!("Profile {profile_id}"),
    )
    .await
}
