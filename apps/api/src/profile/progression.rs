//! Work-log progression: completing a task raises one stat, adds mastery and
//! may move the profile up a class tier.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::catalog::models::{Quest, Stat, Task, STAT_MAX};
use crate::catalog::Catalog;
use crate::profile::models::{ClassTier, QuestCompletion, TaskCompletion, UserProfile};
use crate::skills::newly_unlockable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("task {task_id} was already completed on {day}")]
    AlreadyCompletedToday { task_id: u32, day: NaiveDate },

    #[error("quest {quest_id} is on cooldown until {available_at}")]
    QuestOnCooldown {
        quest_id: u32,
        available_at: DateTime<Utc>,
    },
}

/// What one completion did to the profile.
#[derive(Debug, Clone, Serialize)]
pub struct RewardOutcome {
    pub stat: Stat,
    /// Actual gain after the cap; may be smaller than the reward.
    pub stat_gained: u32,
    pub new_stat_value: u32,
    pub mastery_gained: u64,
    pub total_mastery: u64,
    pub class_tier: ClassTier,
    pub tier_changed: bool,
    /// Reported only; cards are never unlocked implicitly.
    pub newly_unlockable: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskOutcome {
    pub task_id: u32,
    #[serde(flatten)]
    pub reward: RewardOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestOutcome {
    pub quest_id: u32,
    #[serde(flatten)]
    pub reward: RewardOutcome,
    pub available_at: DateTime<Utc>,
}

fn apply_reward(
    profile: &mut UserProfile,
    stat: Stat,
    stat_reward: u32,
    mastery_reward: u64,
    catalog: &Catalog,
) -> RewardOutcome {
    let before = profile.clone();

    let old_value = profile.stats.get(stat);
    let new_value = (old_value + stat_reward).min(STAT_MAX);
    profile.stats.set(stat, new_value);

    profile.mastery += mastery_reward;
    let old_tier = profile.class_tier;
    profile.class_tier = ClassTier::for_mastery(profile.mastery);

    let tier_changed = old_tier != profile.class_tier;
    if tier_changed {
        info!(
            "Profile {} promoted {:?} -> {:?}",
            profile.id, old_tier, profile.class_tier
        );
    }

    RewardOutcome {
        stat,
        stat_gained: new_value - old_value,
        new_stat_value: new_value,
        mastery_gained: mastery_reward,
        total_mastery: profile.mastery,
        class_tier: profile.class_tier,
        tier_changed,
        newly_unlockable: newly_unlockable(catalog, &before, profile),
    }
}

pub fn complete_task(
    profile: &mut UserProfile,
    task: &Task,
    catalog: &Catalog,
    today: NaiveDate,
) -> Result<TaskOutcome, ProgressionError> {
    if task.is_daily && profile.completed_on(task.id, today) {
        return Err(ProgressionError::AlreadyCompletedToday {
            task_id: task.id,
            day: today,
        });
    }

    let reward = apply_reward(
        profile,
        task.stat,
        task.stat_reward,
        task.mastery_reward,
        catalog,
    );
    profile.completions.push(TaskCompletion {
        task_id: task.id,
        completed_on: today,
    });

    Ok(TaskOutcome {
        task_id: task.id,
        reward,
    })
}

/// When `quest` may next be completed, or `None` if it never has been.
pub fn quest_available_at(profile: &UserProfile, quest: &Quest) -> Option<DateTime<Utc>> {
    profile
        .last_quest_completion(quest.id)
        .map(|last| last + Duration::hours(i64::from(quest.cooldown_hours)))
}

pub fn complete_quest(
    profile: &mut UserProfile,
    quest: &Quest,
    catalog: &Catalog,
    now: DateTime<Utc>,
) -> Result<QuestOutcome, ProgressionError> {
    if let Some(available_at) = quest_available_at(profile, quest).filter(|&at| at > now) {
        return Err(ProgressionError::QuestOnCooldown {
            quest_id: quest.id,
            available_at,
        });
    }

    let reward = apply_reward(
        profile,
        quest.target_stat,
        quest.stat_reward,
        quest.mastery_reward,
        catalog,
    );
    profile.quest_completions.push(QuestCompletion {
        quest_id: quest.id,
        completed_at: now,
    });

    Ok(QuestOutcome {
        quest_id: quest.id,
        reward,
        available_at: now + Duration::hours(i64::from(quest.cooldown_hours)),
    })
}

/// Records a self-reported salary. Any previous proof no longer applies.
pub fn update_salary(profile: &mut UserProfile, current_salary: i64, job_title: Option<String>) {
    profile.current_salary = Some(current_salary);
    if job_title.is_some() {
        profile.current_job_title = job_title;
    }
    profile.salary_verification.reset();
}
