use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use super::{build_router, cors_layer};
use crate::catalog::Catalog;
use crate::config::Config;
use crate::errors::AppError;
use crate::profile::store::{ProfileStore, DEMO_PROFILE_ID};
use crate::reports::models::SalaryReport;
use crate::reports::proofs::InMemoryProofStorage;
use crate::reports::store::{InMemoryReportStore, ReportStore};
use crate::reports::verification::{Verification, VerificationStatus};
use crate::state::AppState;

const BOUNDARY: &str = "unsan-test-boundary";

struct TestApp {
    router: Router,
}

fn test_app() -> TestApp {
    test_app_with(Arc::new(InMemoryReportStore::new()))
}

fn test_app_with(reports: Arc<dyn ReportStore>) -> TestApp {
    let state = AppState {
        catalog: Arc::new(Catalog::load_embedded().unwrap()),
        profiles: Arc::new(ProfileStore::seeded()),
        reports,
        proofs: Arc::new(InMemoryProofStorage::new()),
        config: Config::default(),
    };
    TestApp {
        router: build_router(state),
    }
}

/// Holds every read for `delay`, so concurrent requests all act on the same
/// snapshot before any of them writes.
struct SlowReportStore {
    inner: InMemoryReportStore,
    delay: Duration,
}

#[async_trait]
impl ReportStore for SlowReportStore {
    async fn create(&self, report: &SalaryReport) -> Result<(), AppError> {
        self.inner.create(report).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<SalaryReport>, AppError> {
        let report = self.inner.get(id).await;
        tokio::time::sleep(self.delay).await;
        report
    }

    async fn list_for_profile(&self, profile_id: i64) -> Result<Vec<SalaryReport>, AppError> {
        self.inner.list_for_profile(profile_id).await
    }

    async fn update_verification(
        &self,
        id: Uuid,
        expected: VerificationStatus,
        verification: &Verification,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        self.inner
            .update_verification(id, expected, verification, updated_at)
            .await
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

/// GET returning the raw body and its content type.
async fn get_raw(app: &TestApp, uri: &str) -> (StatusCode, Option<String>, Bytes) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, bytes)
}

async fn post_json(app: &TestApp, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

async fn post_file(app: &TestApp, uri: &str, contents: &[u8]) -> (StatusCode, Value) {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"payslip.png\"\r\n\
         Content-Type: image/png\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

fn profile_uri(suffix: &str) -> String {
    format!("/api/profiles/{DEMO_PROFILE_ID}{suffix}")
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog and salary
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_health() {
    let app = test_app();
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["catalog"]["jobs"], 88);
}

#[tokio::test]
async fn test_list_jobs_with_filters() {
    let app = test_app();
    let (status, body) = get(&app, "/api/jobs?group=Maintenance&demand=Stable").await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body["jobs"].as_array().unwrap();
    assert!(!jobs.is_empty());
    assert_eq!(body["total"], jobs.len());
    for job in jobs {
        assert_eq!(job["group"], "Maintenance");
        assert_eq!(job["market_demand"], "Stable");
    }

    let (_, all) = get(&app, "/api/jobs").await;
    assert_eq!(all["total"], 88);
}

#[tokio::test]
async fn test_top_salary_respects_limit() {
    let app = test_app();
    let (status, body) = get(&app, "/api/jobs/top-salary?limit=3").await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body["jobs"].as_array().unwrap();
    assert_eq!(jobs.len(), 3);
    let max = |i: usize| jobs[i]["salary_range"]["max"].as_i64().unwrap();
    assert!(max(0) >= max(1) && max(1) >= max(2));
}

#[tokio::test]
async fn test_ev_transition_jobs() {
    let app = test_app();
    let (status, body) = get(&app, "/api/jobs/ev-transition").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["jobs"]["total"], 11);
    let path: Vec<&str> = body["path"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_str().unwrap())
        .collect();
    assert_eq!(
        path,
        vec!["maint_01", "maint_06", "maint_09", "maint_14", "maint_17", "ev_01", "ev_02", "ev_03", "ev_09"]
    );
}

#[tokio::test]
async fn test_job_detail_and_unknown_job() {
    let app = test_app();
    let (status, body) = get(&app, "/api/jobs/maint_01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["job"]["id"], "maint_01");
    assert_eq!(body["job"]["salary_label"], "2,800~3,500만원");
    assert!(body["prerequisites"].as_array().unwrap().is_empty());

    let (status, body) = get(&app, "/api/jobs/no_such_job").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_career_path_ends_with_target() {
    let app = test_app();
    let catalog = Catalog::load_embedded().unwrap();
    let target = catalog
        .jobs()
        .iter()
        .find(|j| !j.prerequisite_jobs.is_empty())
        .unwrap();

    let (status, body) = get(&app, &format!("/api/jobs/{}/career-path", target.id)).await;
    assert_eq!(status, StatusCode::OK);
    let path = body["path"].as_array().unwrap();
    assert!(path.len() >= 2);
    assert_eq!(path.last().unwrap()["id"], target.id.as_str());
}

#[tokio::test]
async fn test_salary_simulation() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/api/jobs/maint_01/salary-simulation",
        json!({
            "stats": {"Diagnostic": 30, "Mechanical": 55, "Efficiency": 40, "Quality": 20, "Communication": 30},
            "years": 0,
            "current_salary": 3000
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["estimated_salary"], 2850);
    assert_eq!(body["salary_gap"], -150);
    assert_eq!(body["parameters"]["key_stat"], "Mechanical");
    assert_eq!(body["distribution"].as_array().unwrap().len(), 31);
}

#[tokio::test]
async fn test_salary_simulation_from_profile_stats() {
    let app = test_app();
    let (status, body) = post_json(
        &app,
        "/api/jobs/maint_01/salary-simulation",
        json!({"profile_id": DEMO_PROFILE_ID, "years": 0}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    // Mechanical 60 -> 10 points over the pivot
    assert_eq!(body["estimated_salary"], 2900);
}

#[tokio::test]
async fn test_salary_simulation_validation() {
    let app = test_app();
    let (status, _) = post_json(
        &app,
        "/api/jobs/maint_01/salary-simulation",
        json!({"years": 3}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/api/jobs/maint_01/salary-simulation",
        json!({
            "stats": {"Diagnostic": 101, "Mechanical": 0, "Efficiency": 0, "Quality": 0, "Communication": 0},
            "years": 3
        }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ────────────────────────────────────────────────────────────────────────────
// Skill tree and progression
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_skill_tree_for_demo_profile() {
    let app = test_app();
    let (status, body) = get(&app, &profile_uri("/skill-tree")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unlocked"], 3);

    let cards = body["cards"].as_array().unwrap();
    let node = |id: &str| cards.iter().find(|c| c["id"] == id).unwrap().clone();
    assert_eq!(node("maint_1")["state"], "Unlocked");
    assert_eq!(node("maint_2")["state"], "Unlockable");
    assert_eq!(node("body_2")["state"], "Locked");
    assert_eq!(node("legend_flipper")["title"], "???");
}

#[tokio::test]
async fn test_card_detail_lists_prerequisite_path() {
    let app = test_app();
    let (status, body) = get(&app, "/api/cards/maint_3").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prerequisite_path"], json!(["maint_1", "maint_2", "maint_3"]));

    let (status, _) = get(&app, "/api/cards/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unlock_card_flow() {
    let app = test_app();

    let (status, body) = post_json(&app, &profile_uri("/cards/maint_2/unlock"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "unlocked");

    // Quality 25 < 40
    let (status, body) = post_json(&app, &profile_uri("/cards/body_2/unlock"), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("Quality 25/40"));

    let (status, body) = post_json(
        &app,
        &profile_uri("/cards/body_2/unlock"),
        json!({"force": true}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "force_unlocked");

    let (_, profile) = get(&app, &profile_uri("")).await;
    assert_eq!(
        profile["unlocked_card_ids"],
        json!(["maint_1", "body_1", "tech_1", "maint_2", "body_2"])
    );
}

#[tokio::test]
async fn test_complete_task_once_per_day() {
    let app = test_app();
    let (status, body) = post_json(&app, &profile_uri("/complete_task/"), json!({"task_id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["new_stat_value"], 62);
    assert_eq!(body["profile"]["mastery"], 365);
    assert_eq!(body["profile"]["next_tier_mastery"], 500);

    let (status, body) = post_json(&app, &profile_uri("/complete_task/"), json!({"task_id": 1})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = post_json(&app, &profile_uri("/complete_task/"), json!({"task_id": 99})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_task_board_tracks_today() {
    let app = test_app();
    let catalog = Catalog::load_embedded().unwrap();

    let (status, body) = get(&app, "/api/tasks").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), catalog.tasks().len());

    post_json(&app, &profile_uri("/complete_task/"), json!({"task_id": 1})).await;
    let (_, body) = get(&app, &format!("/api/tasks?profile_id={DEMO_PROFILE_ID}")).await;
    let done: Vec<&Value> = body
        .as_array()
        .unwrap()
        .iter()
        .filter(|t| t["is_completed_today"] == true)
        .map(|t| &t["id"])
        .collect();
    assert_eq!(done, vec![&json!(1)]);

    let (status, _) = get(&app, "/api/tasks?profile_id=999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_complete_quest_starts_cooldown() {
    let app = test_app();

    let (status, body) = post_json(&app, &profile_uri("/complete_quest/"), json!({"quest_id": 1})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"]["quest_id"], 1);
    assert_eq!(body["outcome"]["new_stat_value"], 62);
    assert_eq!(body["profile"]["mastery"], 370);
    assert_eq!(body["quest"]["is_available"], false);
    assert_eq!(body["quest"]["total_completions"], 1);

    let (status, body) = post_json(&app, &profile_uri("/complete_quest/"), json!({"quest_id": 1})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("cooldown"));

    let (_, body) = get(&app, &format!("/api/quests?profile_id={DEMO_PROFILE_ID}")).await;
    let quests = body.as_array().unwrap();
    assert_eq!(quests.len(), 12);
    let q1 = quests.iter().find(|q| q["id"] == 1).unwrap();
    assert_eq!(q1["is_available"], false);
    assert!(q1["available_at"].is_string());
    assert!(quests
        .iter()
        .filter(|q| q["id"] != 1)
        .all(|q| q["is_available"] == true));

    let (_, body) = get(&app, "/api/quests?category=Weekly").await;
    let weekly = body.as_array().unwrap();
    assert_eq!(weekly.len(), 2);
    assert!(weekly.iter().all(|q| q["cooldown_hours"] == 168));

    let (status, _) = post_json(&app, &profile_uri("/complete_quest/"), json!({"quest_id": 99})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dashboard() {
    let app = test_app();
    let catalog = Catalog::load_embedded().unwrap();
    post_json(&app, &profile_uri("/complete_task/"), json!({"task_id": 3})).await;

    let (status, body) = get(&app, &profile_uri("/dashboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["name"], "김정비");
    assert_eq!(body["profile"]["mastery"], 370);
    assert_eq!(body["today_completions"], 1);
    assert_eq!(body["cards"].as_array().unwrap().len(), catalog.cards().len());

    let daily = body["daily_tasks"].as_array().unwrap();
    assert_eq!(daily.len(), catalog.tasks().iter().filter(|t| t.is_daily).count());
    let t3 = daily.iter().find(|t| t["id"] == 3).unwrap();
    assert_eq!(t3["is_completed_today"], true);

    let (status, _) = get(&app, "/api/profiles/999/dashboard").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ────────────────────────────────────────────────────────────────────────────
// Salary self-report and reports
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_profile_salary_proof_flow() {
    let app = test_app();

    let (status, _) = post_file(&app, &profile_uri("/upload_salary_proof/"), b"png").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_json(
        &app,
        &profile_uri("/update_salary/"),
        json!({"current_salary": 3200, "current_job_title": "정비사"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["current_salary"], 3200);
    assert_eq!(body["salary_verification"]["status"], "None");

    let (status, body) = post_file(&app, &profile_uri("/upload_salary_proof/"), b"png").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["salary_verification"]["status"], "Pending");
    let key = body["salary_verification"]["proof_key"].as_str().unwrap();
    assert!(key.starts_with("salary_proofs/profiles/1/"));

    let (status, content_type, bytes) = get_raw(&app, &profile_uri("/salary_proof")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(bytes, Bytes::from_static(b"png"));

    // a new salary invalidates the proof
    let (_, body) = post_json(
        &app,
        &profile_uri("/update_salary/"),
        json!({"current_salary": 3400}),
    )
    .await;
    assert_eq!(body["salary_verification"]["status"], "None");
    assert_eq!(body["current_job_title"], "정비사");
}

#[tokio::test]
async fn test_update_salary_rejects_non_positive() {
    let app = test_app();
    let (status, _) = post_json(&app, &profile_uri("/update_salary/"), json!({"current_salary": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_report_lifecycle() {
    let app = test_app();

    let (status, report) = post_json(
        &app,
        "/api/reports/",
        json!({
            "profile_id": DEMO_PROFILE_ID,
            "target_job_id": "maint_01",
            "current_salary": 3150,
            "years_experience": 0
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(report["status"], "None");
    assert_eq!(report["percentile"], 50);
    assert_eq!(report["estimated_salary"], 2900);
    assert_eq!(report["salary_gap"], -250);
    let id = report["id"].as_str().unwrap().to_string();

    // review before any proof
    let (status, _) = post_json(&app, &format!("/api/reports/{id}/review"), json!({"approve": true})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = post_file(&app, &format!("/api/reports/{id}/upload_proof/"), b"pdf").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Pending");
    assert!(body["proof_key"]
        .as_str()
        .unwrap()
        .starts_with(&format!("salary_proofs/reports/{id}/")));

    let (status, _) = post_json(&app, &format!("/api/reports/{id}/review"), json!({"approve": false})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(&app, &format!("/api/reports/{id}/review"), json!({"approve": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Verified");
    assert!(body["verified_at"].is_string());

    let (status, _) = post_file(&app, &format!("/api/reports/{id}/upload_proof/"), b"pdf").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = get(&app, &format!("/api/reports/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Verified");
}

#[tokio::test]
async fn test_rejected_report_can_resubmit() {
    let app = test_app();
    let (_, report) = post_json(
        &app,
        "/api/reports/",
        json!({"profile_id": DEMO_PROFILE_ID, "target_job_id": "maint_01", "current_salary": 3000, "years_experience": 2}),
    )
    .await;
    let id = report["id"].as_str().unwrap().to_string();

    post_file(&app, &format!("/api/reports/{id}/upload_proof/"), b"first").await;
    let (status, body) = post_json(
        &app,
        &format!("/api/reports/{id}/review"),
        json!({"approve": false, "reason": "unreadable"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Rejected");
    assert_eq!(body["rejection_reason"], "unreadable");

    let (status, body) = post_file(&app, &format!("/api/reports/{id}/upload_proof/"), b"second").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Pending");
    assert_eq!(body["rejection_reason"], Value::Null);
}

#[tokio::test]
async fn test_report_validation_and_listing() {
    let app = test_app();

    let (status, _) = post_json(
        &app,
        "/api/reports/",
        json!({"profile_id": DEMO_PROFILE_ID, "target_job_id": "maint_01", "current_salary": -5, "years_experience": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app,
        "/api/reports/",
        json!({"profile_id": 999, "target_job_id": "maint_01", "current_salary": 3000, "years_experience": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for salary in [3000, 3100] {
        let (status, _) = post_json(
            &app,
            "/api/reports/",
            json!({"profile_id": DEMO_PROFILE_ID, "target_job_id": "maint_01", "current_salary": salary, "years_experience": 1}),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = get(&app, &profile_uri("/reports")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (status, _) = get(&app, &format!("/api/reports/{}", uuid::Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_profile_salary_review() {
    let app = test_app();

    // nothing pending yet
    let (status, _) = post_json(&app, &profile_uri("/salary_review"), json!({"approve": true})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    let (status, _, _) = get_raw(&app, &profile_uri("/salary_proof")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    post_json(&app, &profile_uri("/update_salary/"), json!({"current_salary": 3200})).await;
    post_file(&app, &profile_uri("/upload_salary_proof/"), b"slip").await;

    let (status, _) = post_json(&app, &profile_uri("/salary_review"), json!({"approve": false})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = post_json(
        &app,
        &profile_uri("/salary_review"),
        json!({"approve": false, "reason": "name does not match"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["salary_verification"]["status"], "Rejected");
    assert_eq!(body["salary_verification"]["rejection_reason"], "name does not match");

    post_file(&app, &profile_uri("/upload_salary_proof/"), b"slip2").await;
    let (status, body) = post_json(&app, &profile_uri("/salary_review"), json!({"approve": true})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["salary_verification"]["status"], "Verified");
    assert!(body["salary_verification"]["verified_at"].is_string());

    let (_, profile) = get(&app, &profile_uri("")).await;
    assert_eq!(profile["salary_verification"]["status"], "Verified");

    let (status, _) = post_json(&app, "/api/profiles/999/salary_review", json!({"approve": true})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_proof_download() {
    let app = test_app();
    let (_, report) = post_json(
        &app,
        "/api/reports/",
        json!({"profile_id": DEMO_PROFILE_ID, "target_job_id": "maint_01", "current_salary": 3000, "years_experience": 1}),
    )
    .await;
    let id = report["id"].as_str().unwrap().to_string();

    let (status, _, _) = get_raw(&app, &format!("/api/reports/{id}/proof")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    post_file(&app, &format!("/api/reports/{id}/upload_proof/"), b"%PDF-1.4").await;
    let (status, content_type, bytes) = get_raw(&app, &format!("/api/reports/{id}/proof")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("image/png"));
    assert_eq!(bytes, Bytes::from_static(b"%PDF-1.4"));

    let (status, _, _) = get_raw(&app, &format!("/api/reports/{}/proof", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_concurrent_reviews_only_one_wins() {
    let app = test_app_with(Arc::new(SlowReportStore {
        inner: InMemoryReportStore::new(),
        delay: Duration::from_millis(20),
    }));
    let (_, report) = post_json(
        &app,
        "/api/reports/",
        json!({"profile_id": DEMO_PROFILE_ID, "target_job_id": "maint_01", "current_salary": 3000, "years_experience": 1}),
    )
    .await;
    let id = report["id"].as_str().unwrap().to_string();
    post_file(&app, &format!("/api/reports/{id}/upload_proof/"), b"slip").await;

    let review_uri = format!("/api/reports/{id}/review");
    let ((approve_status, approved), (reject_status, rejected)) = tokio::join!(
        post_json(&app, &review_uri, json!({"approve": true})),
        post_json(&app, &review_uri, json!({"approve": false, "reason": "blurry"})),
    );

    let statuses = [approve_status, reject_status];
    assert!(statuses.contains(&StatusCode::OK));
    assert!(statuses.contains(&StatusCode::CONFLICT));

    let winner = if approve_status == StatusCode::OK { approved } else { rejected };
    let (_, stored) = get(&app, &format!("/api/reports/{id}")).await;
    assert_eq!(stored["status"], winner["status"]);
    assert_eq!(stored["rejection_reason"], winner["rejection_reason"]);
}

// ────────────────────────────────────────────────────────────────────────────
// CORS
// ────────────────────────────────────────────────────────────────────────────

async fn allowed_origin(router: &Router, origin: &str) -> Option<String> {
    let request = Request::builder()
        .uri("/health")
        .header(header::ORIGIN, origin)
        .body(Body::empty())
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let origins = vec!["https://unsan.kr".to_string()];
    let router = test_app().router.layer(cors_layer(&origins).unwrap());

    assert_eq!(
        allowed_origin(&router, "https://unsan.kr").await.as_deref(),
        Some("https://unsan.kr")
    );
    assert_eq!(allowed_origin(&router, "https://evil.example").await, None);
}

#[tokio::test]
async fn test_cors_permissive_without_origins() {
    let router = test_app().router.layer(cors_layer(&[]).unwrap());
    assert_eq!(
        allowed_origin(&router, "https://anywhere.example").await.as_deref(),
        Some("*")
    );
}

#[test]
fn test_cors_rejects_malformed_origin() {
    assert!(cors_layer(&["https://bad\norigin".to_string()]).is_err());
}
