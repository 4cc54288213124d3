//! Career path resolution over the job prerequisite graph, plus the matching
//! walk over the card tree.

use crate::catalog::graph::GraphError;
use crate::catalog::models::{Job, JobCard};
use crate::catalog::{Catalog, CatalogError};

impl Catalog {
    /// Jobs listed directly as prerequisites of `job_id`, in declaration order.
    pub fn direct_prerequisites(&self, job_id: &str) -> Result<Vec<&Job>, CatalogError> {
        let job = self
            .job(job_id)
            .ok_or_else(|| CatalogError::UnknownJob(job_id.to_string()))?;
        Ok(job
            .prerequisite_jobs
            .iter()
            .filter_map(|id| self.job(id))
            .collect())
    }

    /// Every job on the way to `target_job_id`, entry level first, target last.
    /// Shared prerequisites appear once.
    pub fn full_career_path(&self, target_job_id: &str) -> Result<Vec<&Job>, CatalogError> {
        let ids = self
            .job_graph()
            .path_to(target_job_id)
            .map_err(|e| graph_error("job", e))?;
        Ok(ids.into_iter().filter_map(|id| self.job(id)).collect())
    }

    /// Jobs that list `job_id` as a direct prerequisite, in catalog order.
    pub fn dependents_of(&self, job_id: &str) -> Result<Vec<&Job>, CatalogError> {
        if self.job(job_id).is_none() {
            return Err(CatalogError::UnknownJob(job_id.to_string()));
        }
        Ok(self
            .job_graph()
            .dependents(job_id)
            .into_iter()
            .filter_map(|id| self.job(id))
            .collect())
    }

    /// Cards transitively required by `card_id`, ending with the card itself.
    pub fn card_prerequisite_path(&self, card_id: &str) -> Result<Vec<&JobCard>, CatalogError> {
        let ids = self
            .card_graph()
            .path_to(card_id)
            .map_err(|e| graph_error("card", e))?;
        Ok(ids.into_iter().filter_map(|id| self.card(id)).collect())
    }
}

fn graph_error(kind: &'static str, err: GraphError) -> CatalogError {
    match err {
        GraphError::UnknownNode(id) if kind == "card" => CatalogError::UnknownCard(id),
        GraphError::UnknownNode(id) => CatalogError::UnknownJob(id),
        GraphError::Cycle(cycle) => CatalogError::CyclicDependency { kind, cycle },
    }
}
