//! Browsing helpers over the job catalog: grouping, ranking and search.

use std::collections::BTreeMap;

use crate::catalog::models::{Job, JobGroup, MarketDemand, SalaryRange, Stat};
use crate::catalog::{Catalog, CatalogError};

const STARTER_TAGS: &[&str] = &["입문추천", "빠른취업"];
const BLUE_OCEAN_MIN_SALARY: i64 = 6000;
pub const DEFAULT_STAT_TOLERANCE: u32 = 20;

/// Non-EV-group jobs that still belong to the electrification track.
const EV_RELATED_JOB_IDS: &[&str] = &["maint_17"];

/// Engine mechanic to EV specialist, in order.
const EV_TRANSITION_PATH: &[&str] = &[
    "maint_01", "maint_06", "maint_09", "maint_14", "maint_17",
    "ev_01", "ev_02", "ev_03", "ev_09",
];

/// High ceiling and rising demand.
pub fn is_blue_ocean(job: &Job) -> bool {
    job.salary_range.max >= BLUE_OCEAN_MIN_SALARY
        && matches!(
            job.market_demand,
            MarketDemand::Explosive | MarketDemand::High
        )
}

/// Entry-level: no prerequisite jobs.
pub fn is_starter(job: &Job) -> bool {
    job.prerequisite_jobs.is_empty()
}

pub fn is_ev_transition(job: &Job) -> bool {
    job.group == JobGroup::EvFuture || EV_RELATED_JOB_IDS.contains(&job.id.as_str())
}

/// Formats a range the way the catalog displays it, e.g. `4,500~8,000만원`.
pub fn format_salary_range(range: &SalaryRange) -> String {
    format!(
        "{}~{}만원",
        group_thousands(range.min),
        group_thousands(range.max)
    )
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

impl Catalog {
    pub fn jobs_by_group(&self, group: JobGroup) -> Vec<&Job> {
        self.jobs().iter().filter(|j| j.group == group).collect()
    }

    pub fn jobs_by_demand(&self, demand: MarketDemand) -> Vec<&Job> {
        self.jobs()
            .iter()
            .filter(|j| j.market_demand == demand)
            .collect()
    }

    pub fn top_salary_jobs(&self, limit: usize) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self.jobs().iter().collect();
        jobs.sort_by(|a, b| b.salary_range.max.cmp(&a.salary_range.max));
        jobs.truncate(limit);
        jobs
    }

    pub fn hot_trend_jobs(&self, limit: usize) -> Vec<&Job> {
        let mut jobs = self.jobs_by_demand(MarketDemand::Explosive);
        jobs.sort_by(|a, b| b.salary_range.max.cmp(&a.salary_range.max));
        jobs.truncate(limit);
        jobs
    }

    /// Starter-tagged jobs, easiest (lowest total requirement) first.
    pub fn best_starter_jobs(&self, limit: usize) -> Vec<&Job> {
        let mut jobs: Vec<&Job> = self
            .jobs()
            .iter()
            .filter(|j| j.tags.iter().any(|t| STARTER_TAGS.contains(&t.as_str())))
            .collect();
        jobs.sort_by_key(|j| j.required_stats.total());
        jobs.truncate(limit);
        jobs
    }

    /// Case-insensitive match against title, description and tags.
    pub fn search(&self, query: &str) -> Vec<&Job> {
        let needle = query.to_lowercase();
        self.jobs()
            .iter()
            .filter(|j| {
                j.title.to_lowercase().contains(&needle)
                    || j.description.to_lowercase().contains(&needle)
                    || j.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Jobs whose requirement for every supplied stat lies within `tolerance`.
    pub fn filter_by_stats(&self, stats: &BTreeMap<Stat, u32>, tolerance: u32) -> Vec<&Job> {
        self.jobs()
            .iter()
            .filter(|j| {
                stats
                    .iter()
                    .all(|(&stat, &value)| j.required_stats.get(stat).abs_diff(value) <= tolerance)
            })
            .collect()
    }

    pub fn blue_ocean_jobs(&self) -> Vec<&Job> {
        self.jobs().iter().filter(|j| is_blue_ocean(j)).collect()
    }

    pub fn starter_jobs(&self) -> Vec<&Job> {
        self.jobs().iter().filter(|j| is_starter(j)).collect()
    }

    pub fn ev_transition_jobs(&self) -> Vec<&Job> {
        self.jobs().iter().filter(|j| is_ev_transition(j)).collect()
    }

    /// The recommended internal-combustion to EV route.
    pub fn ev_transition_path(&self) -> Result<Vec<&Job>, CatalogError> {
        EV_TRANSITION_PATH
            .iter()
            .map(|id| {
                self.job(id)
                    .ok_or_else(|| CatalogError::UnknownJob(id.to_string()))
            })
            .collect()
    }
}
