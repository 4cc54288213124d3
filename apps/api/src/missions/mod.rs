// Mission boards: the work-log task list and the quest list, each annotated
// with one profile's progress.
// Completing either goes through profile::progression; this module only reads.

pub mod handlers;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use crate::catalog::models::{Quest, QuestCategory, Task};
use crate::catalog::Catalog;
use crate::profile::models::UserProfile;
use crate::profile::progression::quest_available_at;

#[derive(Debug, Clone, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub is_completed_today: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestView {
    #[serde(flatten)]
    pub quest: Quest,
    pub is_available: bool,
    /// Set only while the quest is cooling down.
    pub available_at: Option<DateTime<Utc>>,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub total_completions: usize,
}

/// Every task in catalog order. Without a profile nothing counts as done.
pub fn task_board(catalog: &Catalog, profile: Option<&UserProfile>, today: NaiveDate) -> Vec<TaskView> {
    catalog
        .tasks()
        .iter()
        .map(|task| TaskView {
            task: task.clone(),
            is_completed_today: profile.is_some_and(|p| p.completed_on(task.id, today)),
        })
        .collect()
}

pub fn daily_tasks(catalog: &Catalog, profile: &UserProfile, today: NaiveDate) -> Vec<TaskView> {
    task_board(catalog, Some(profile), today)
        .into_iter()
        .filter(|view| view.task.is_daily)
        .collect()
}

pub fn quest_view(quest: &Quest, profile: Option<&UserProfile>, now: DateTime<Utc>) -> QuestView {
    let available_at = profile
        .and_then(|p| quest_available_at(p, quest))
        .filter(|&at| at > now);

    QuestView {
        quest: quest.clone(),
        is_available: available_at.is_none(),
        available_at,
        last_completed_at: profile.and_then(|p| p.last_quest_completion(quest.id)),
        total_completions: profile.map_or(0, |p| p.quest_completion_count(quest.id)),
    }
}

/// Quests in catalog order, optionally narrowed to one category.
pub fn quest_board(
    catalog: &Catalog,
    profile: Option<&UserProfile>,
    category: Option<QuestCategory>,
    now: DateTime<Utc>,
) -> Vec<QuestView> {
    catalog
        .quests()
        .iter()
        .filter(|q| category.map_or(true, |c| q.category == c))
        .map(|q| quest_view(q, profile, now))
        .collect()
}
