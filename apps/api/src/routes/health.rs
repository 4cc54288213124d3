use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service version and catalog size.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "unsan-api",
        "catalog": {
            "jobs": state.catalog.jobs().len(),
            "cards": state.catalog.cards().len(),
            "tasks": state.catalog.tasks().len(),
            "quests": state.catalog.quests().len()
        }
    }))
}
