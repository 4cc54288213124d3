// Static career data: the job catalog, the skill-tree cards, the work-log tasks
// and the cooldown quests.
// Loaded once at startup, validated, then shared read-only behind an Arc.

pub mod career_path;
pub mod filters;
pub mod graph;
pub mod handlers;
pub mod models;

use std::collections::HashMap;

use thiserror::Error;
use tracing::info;

use crate::catalog::graph::{duplicate_ids, DanglingReference, PrereqGraph};
use crate::catalog::models::{Job, JobCard, Quest, Task};

const JOBS_JSON: &str = include_str!("../../data/jobs.json");
const CARDS_JSON: &str = include_str!("../../data/cards.json");
const TASKS_JSON: &str = include_str!("../../data/tasks.json");
const QUESTS_JSON: &str = include_str!("../../data/quests.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate {kind} ids: {}", .ids.join(", "))]
    DuplicateIds { kind: &'static str, ids: Vec<String> },

    #[error("job '{id}' has invalid salary range {min}~{max} (max must exceed min)")]
    InvalidSalaryRange { id: String, min: i64, max: i64 },

    #[error("card '{id}' has rank {rank}, expected 1-4")]
    InvalidRank { id: String, rank: u8 },

    #[error("quest {id} has difficulty {difficulty}, expected 1-5")]
    InvalidDifficulty { id: u32, difficulty: u8 },

    #[error("quest {id} has no cooldown")]
    MissingCooldown { id: u32 },

    #[error("{kind} prerequisites reference unknown ids: {}", format_dangling(.references))]
    DanglingReferences {
        kind: &'static str,
        references: Vec<DanglingReference>,
    },

    #[error("cyclic {kind} prerequisites: {}", .cycle.join(" -> "))]
    CyclicDependency {
        kind: &'static str,
        cycle: Vec<String>,
    },

    #[error("unknown job '{0}'")]
    UnknownJob(String),

    #[error("unknown card '{0}'")]
    UnknownCard(String),
}

fn format_dangling(references: &[DanglingReference]) -> String {
    references
        .iter()
        .map(|r| format!("{} -> {}", r.node, r.missing))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Validated, immutable catalog. Construction is the only place prerequisite
/// integrity is checked; every query afterwards may assume a DAG with no
/// dangling references.
#[derive(Debug)]
pub struct Catalog {
    jobs: Vec<Job>,
    job_index: HashMap<String, usize>,
    cards: Vec<JobCard>,
    card_index: HashMap<String, usize>,
    tasks: Vec<Task>,
    quests: Vec<Quest>,
}

impl Catalog {
    /// Parses and validates the data bundled into the binary.
    pub fn load_embedded() -> Result<Self, CatalogError> {
        let jobs: Vec<Job> = serde_json::from_str(JOBS_JSON).map_err(|source| {
            CatalogError::Parse {
                file: "jobs.json",
                source,
            }
        })?;
        let cards: Vec<JobCard> = serde_json::from_str(CARDS_JSON).map_err(|source| {
            CatalogError::Parse {
                file: "cards.json",
                source,
            }
        })?;
        let tasks: Vec<Task> = serde_json::from_str(TASKS_JSON).map_err(|source| {
            CatalogError::Parse {
                file: "tasks.json",
                source,
            }
        })?;

        let quests: Vec<Quest> = serde_json::from_str(QUESTS_JSON).map_err(|source| {
            CatalogError::Parse {
                file: "quests.json",
                source,
            }
        })?;

        let catalog = Self::from_parts(jobs, cards, tasks)?.with_quests(quests)?;
        info!(
            "Catalog loaded: {} jobs, {} cards, {} tasks, {} quests",
            catalog.jobs.len(),
            catalog.cards.len(),
            catalog.tasks.len(),
            catalog.quests.len()
        );
        Ok(catalog)
    }

    pub fn from_parts(
        jobs: Vec<Job>,
        cards: Vec<JobCard>,
        tasks: Vec<Task>,
    ) -> Result<Self, CatalogError> {
        validate_jobs(&jobs)?;
        validate_cards(&cards)?;

        let task_ids: Vec<String> = tasks.iter().map(|t| t.id.to_string()).collect();
        let task_dups = duplicate_ids(task_ids.iter().map(String::as_str));
        if !task_dups.is_empty() {
            return Err(CatalogError::DuplicateIds {
                kind: "task",
                ids: task_dups,
            });
        }

        let job_index = jobs
            .iter()
            .enumerate()
            .map(|(i, j)| (j.id.clone(), i))
            .collect();
        let card_index = cards
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id.clone(), i))
            .collect();

        Ok(Self {
            jobs,
            job_index,
            cards,
            card_index,
            tasks,
            quests: Vec::new(),
        })
    }

    /// Attaches the quest board. Quests reference nothing else in the catalog,
    /// so they are validated on their own.
    pub fn with_quests(mut self, quests: Vec<Quest>) -> Result<Self, CatalogError> {
        let ids: Vec<String> = quests.iter().map(|q| q.id.to_string()).collect();
        let dups = duplicate_ids(ids.iter().map(String::as_str));
        if !dups.is_empty() {
            return Err(CatalogError::DuplicateIds {
                kind: "quest",
                ids: dups,
            });
        }
        if let Some(q) = quests.iter().find(|q| !(1..=5).contains(&q.difficulty)) {
            return Err(CatalogError::InvalidDifficulty {
                id: q.id,
                difficulty: q.difficulty,
            });
        }
        if let Some(q) = quests.iter().find(|q| q.cooldown_hours == 0) {
            return Err(CatalogError::MissingCooldown { id: q.id });
        }

        self.quests = quests;
        Ok(self)
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn cards(&self) -> &[JobCard] {
        &self.cards
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.job_index.get(id).map(|&i| &self.jobs[i])
    }

    pub fn card(&self, id: &str) -> Option<&JobCard> {
        self.card_index.get(id).map(|&i| &self.cards[i])
    }

    pub fn task(&self, id: u32) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn quest(&self, id: u32) -> Option<&Quest> {
        self.quests.iter().find(|q| q.id == id)
    }

    pub(crate) fn job_graph(&self) -> PrereqGraph<'_> {
        PrereqGraph::new(
            self.jobs
                .iter()
                .map(|j| (j.id.as_str(), j.prerequisite_jobs.as_slice())),
        )
    }

    pub(crate) fn card_graph(&self) -> PrereqGraph<'_> {
        PrereqGraph::new(
            self.cards
                .iter()
                .map(|c| (c.id.as_str(), c.prerequisite_card_ids.as_slice())),
        )
    }
}

fn validate_jobs(jobs: &[Job]) -> Result<(), CatalogError> {
    let dups = duplicate_ids(jobs.iter().map(|j| j.id.as_str()));
    if !dups.is_empty() {
        return Err(CatalogError::DuplicateIds {
            kind: "job",
            ids: dups,
        });
    }

    if let Some(job) = jobs
        .iter()
        .find(|j| j.salary_range.max <= j.salary_range.min)
    {
        return Err(CatalogError::InvalidSalaryRange {
            id: job.id.clone(),
            min: job.salary_range.min,
            max: job.salary_range.max,
        });
    }

    let graph = PrereqGraph::new(
        jobs.iter()
            .map(|j| (j.id.as_str(), j.prerequisite_jobs.as_slice())),
    );
    validate_graph("job", &graph)
}

fn validate_cards(cards: &[JobCard]) -> Result<(), CatalogError> {
    let dups = duplicate_ids(cards.iter().map(|c| c.id.as_str()));
    if !dups.is_empty() {
        return Err(CatalogError::DuplicateIds {
            kind: "card",
            ids: dups,
        });
    }

    if let Some(card) = cards.iter().find(|c| !(1..=4).contains(&c.rank)) {
        return Err(CatalogError::InvalidRank {
            id: card.id.clone(),
            rank: card.rank,
        });
    }

    let graph = PrereqGraph::new(
        cards
            .iter()
            .map(|c| (c.id.as_str(), c.prerequisite_card_ids.as_slice())),
    );
    validate_graph("card", &graph)
}

fn validate_graph(kind: &'static str, graph: &PrereqGraph<'_>) -> Result<(), CatalogError> {
    let references = graph.dangling();
    if !references.is_empty() {
        return Err(CatalogError::DanglingReferences { kind, references });
    }
    if let Some(cycle) = graph.find_cycle() {
        return Err(CatalogError::CyclicDependency { kind, cycle });
    }
    Ok(())
}
