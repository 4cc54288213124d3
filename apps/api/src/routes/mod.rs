pub mod health;

use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::catalog::handlers as catalog;
use crate::missions::handlers as missions;
use crate::profile::handlers as profile;
use crate::reports::handlers as reports;
use crate::salary::handlers as salary;
use crate::skills::handlers as skills;
use crate::state::AppState;

/// Multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Job catalog
        .route("/api/jobs", get(catalog::handle_list_jobs))
        .route("/api/jobs/starters", get(catalog::handle_starter_jobs))
        .route(
            "/api/jobs/best-starters",
            get(catalog::handle_best_starter_jobs),
        )
        .route("/api/jobs/blue-ocean", get(catalog::handle_blue_ocean_jobs))
        .route("/api/jobs/top-salary", get(catalog::handle_top_salary_jobs))
        .route("/api/jobs/hot-trend", get(catalog::handle_hot_trend_jobs))
        .route(
            "/api/jobs/ev-transition",
            get(catalog::handle_ev_transition_jobs),
        )
        .route("/api/jobs/match", post(catalog::handle_match_jobs))
        .route("/api/jobs/:id", get(catalog::handle_get_job))
        .route("/api/jobs/:id/career-path", get(catalog::handle_career_path))
        .route(
            "/api/jobs/:id/salary-simulation",
            post(salary::handle_salary_simulation),
        )
        // Skill tree
        .route("/api/cards", get(skills::handle_list_cards))
        .route("/api/cards/:card_id", get(skills::handle_get_card))
        .route(
            "/api/profiles/:id/skill-tree",
            get(skills::handle_skill_tree),
        )
        .route(
            "/api/profiles/:id/cards/:card_id/unlock",
            post(skills::handle_unlock_card),
        )
        // Missions
        .route("/api/tasks", get(missions::handle_list_tasks))
        .route("/api/quests", get(missions::handle_list_quests))
        // Profiles
        .route("/api/profiles/:id", get(profile::handle_get_profile))
        .route(
            "/api/profiles/:id/dashboard",
            get(missions::handle_dashboard),
        )
        .route(
            "/api/profiles/:id/complete_task/",
            post(profile::handle_complete_task),
        )
        .route(
            "/api/profiles/:id/complete_quest/",
            post(missions::handle_complete_quest),
        )
        .route(
            "/api/profiles/:id/update_salary/",
            post(profile::handle_update_salary),
        )
        .route(
            "/api/profiles/:id/upload_salary_proof/",
            post(profile::handle_upload_salary_proof),
        )
        .route(
            "/api/profiles/:id/salary_review",
            post(profile::handle_review_salary),
        )
        .route(
            "/api/profiles/:id/salary_proof",
            get(profile::handle_get_salary_proof),
        )
        .route(
            "/api/profiles/:id/reports",
            get(reports::handle_list_profile_reports),
        )
        // Salary reports
        .route("/api/reports/", post(reports::handle_create_report))
        .route("/api/reports/:id", get(reports::handle_get_report))
        .route(
            "/api/reports/:id/upload_proof/",
            post(reports::handle_upload_report_proof),
        )
        .route("/api/reports/:id/proof", get(reports::handle_get_report_proof))
        .route("/api/reports/:id/review", post(reports::handle_review_report))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Permissive when no origins are configured, otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin '{o}'")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}

#[cfg(test)]
mod tests;
