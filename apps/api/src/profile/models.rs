use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::models::StatVector;
use crate::reports::verification::Verification;

/// Professional grade, derived from accumulated mastery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ClassTier {
    Trainee,
    #[serde(rename = "C-Class")]
    CClass,
    #[serde(rename = "B-Class")]
    BClass,
    #[serde(rename = "A-Class")]
    AClass,
    #[serde(rename = "S-Class")]
    SClass,
    Master,
}

impl ClassTier {
    const LADDER: [ClassTier; 6] = [
        ClassTier::Trainee,
        ClassTier::CClass,
        ClassTier::BClass,
        ClassTier::AClass,
        ClassTier::SClass,
        ClassTier::Master,
    ];

    pub fn min_mastery(&self) -> u64 {
        match self {
            ClassTier::Trainee => 0,
            ClassTier::CClass => 100,
            ClassTier::BClass => 500,
            ClassTier::AClass => 2_000,
            ClassTier::SClass => 5_000,
            ClassTier::Master => 10_000,
        }
    }

    pub fn for_mastery(mastery: u64) -> Self {
        Self::LADDER
            .iter()
            .rev()
            .copied()
            .find(|tier| mastery >= tier.min_mastery())
            .unwrap_or(ClassTier::Trainee)
    }

    pub fn next(&self) -> Option<ClassTier> {
        let pos = Self::LADDER.iter().position(|t| t == self)?;
        Self::LADDER.get(pos + 1).copied()
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            ClassTier::Trainee => "수습",
            ClassTier::CClass => "C등급",
            ClassTier::BClass => "B등급",
            ClassTier::AClass => "A등급",
            ClassTier::SClass => "S등급",
            ClassTier::Master => "명장",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCompletion {
    pub task_id: u32,
    pub completed_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestCompletion {
    pub quest_id: u32,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub stats: StatVector,
    pub mastery: u64,
    pub class_tier: ClassTier,
    /// Insertion-ordered; never contains duplicates.
    pub unlocked_card_ids: Vec<String>,
    #[serde(default)]
    pub completions: Vec<TaskCompletion>,
    #[serde(default)]
    pub quest_completions: Vec<QuestCompletion>,
    pub current_salary: Option<i64>,
    pub current_job_title: Option<String>,
    #[serde(default)]
    pub salary_verification: Verification,
}

impl UserProfile {
    pub fn new(id: i64, name: impl Into<String>, stats: StatVector) -> Self {
        Self {
            id,
            name: name.into(),
            stats,
            mastery: 0,
            class_tier: ClassTier::Trainee,
            unlocked_card_ids: Vec::new(),
            completions: Vec::new(),
            quest_completions: Vec::new(),
            current_salary: None,
            current_job_title: None,
            salary_verification: Verification::default(),
        }
    }

    pub fn has_unlocked(&self, card_id: &str) -> bool {
        self.unlocked_card_ids.iter().any(|id| id == card_id)
    }

    pub fn completed_on(&self, task_id: u32, day: NaiveDate) -> bool {
        self.completions
            .iter()
            .any(|c| c.task_id == task_id && c.completed_on == day)
    }

    pub fn last_quest_completion(&self, quest_id: u32) -> Option<DateTime<Utc>> {
        self.quest_completions
            .iter()
            .filter(|c| c.quest_id == quest_id)
            .map(|c| c.completed_at)
            .max()
    }

    pub fn quest_completion_count(&self, quest_id: u32) -> usize {
        self.quest_completions
            .iter()
            .filter(|c| c.quest_id == quest_id)
            .count()
    }
}

/// Profile as returned to clients, with tier progress filled in.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    pub profile: UserProfile,
    pub class_name: &'static str,
    pub current_tier_mastery: u64,
    pub next_tier_mastery: Option<u64>,
}

impl From<UserProfile> for ProfileView {
    fn from(profile: UserProfile) -> Self {
        let tier = profile.class_tier;
        Self {
            class_name: tier.korean_name(),
            current_tier_mastery: tier.min_mastery(),
            next_tier_mastery: tier.next().map(|t| t.min_mastery()),
            profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(ClassTier::for_mastery(0), ClassTier::Trainee);
        assert_eq!(ClassTier::for_mastery(99), ClassTier::Trainee);
        assert_eq!(ClassTier::for_mastery(100), ClassTier::CClass);
        assert_eq!(ClassTier::for_mastery(350), ClassTier::CClass);
        assert_eq!(ClassTier::for_mastery(500), ClassTier::BClass);
        assert_eq!(ClassTier::for_mastery(1_999), ClassTier::BClass);
        assert_eq!(ClassTier::for_mastery(2_000), ClassTier::AClass);
        assert_eq!(ClassTier::for_mastery(5_000), ClassTier::SClass);
        assert_eq!(ClassTier::for_mastery(1_000_000), ClassTier::Master);
    }

    #[test]
    fn test_next_tier() {
        assert_eq!(ClassTier::Trainee.next(), Some(ClassTier::CClass));
        assert_eq!(ClassTier::Master.next(), None);
    }

    #[test]
    fn test_view_progress_fields() {
        let mut p = UserProfile::new(1, "tester", StatVector::default());
        p.mastery = 350;
        p.class_tier = ClassTier::for_mastery(p.mastery);
        let view = ProfileView::from(p);
        assert_eq!(view.current_tier_mastery, 100);
        assert_eq!(view.next_tier_mastery, Some(500));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["class_tier"], "C-Class");
        assert_eq!(json["mastery"], 350);
    }
}
