use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::profile::store::ProfileStore;
use crate::reports::proofs::ProofStorage;
use crate::reports::store::ReportStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Validated at startup, read-only afterwards.
    pub catalog: Arc<Catalog>,
    pub profiles: Arc<ProfileStore>,
    /// Postgres when `DATABASE_URL` is set, in-memory otherwise.
    pub reports: Arc<dyn ReportStore>,
    /// S3 when configured, in-memory otherwise.
    pub proofs: Arc<dyn ProofStorage>,
    pub config: Config,
}
