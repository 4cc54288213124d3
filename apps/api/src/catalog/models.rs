use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The five professional competencies. Declaration order is the canonical
/// iteration order used for tie-breaking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stat {
    #[serde(alias = "T", alias = "Tech")]
    Diagnostic,
    #[serde(alias = "H", alias = "Hand")]
    Mechanical,
    #[serde(alias = "S", alias = "Speed")]
    Efficiency,
    #[serde(alias = "A", alias = "Art")]
    Quality,
    #[serde(alias = "B", alias = "Biz")]
    Communication,
}

impl Stat {
    pub const ALL: [Stat; 5] = [
        Stat::Diagnostic,
        Stat::Mechanical,
        Stat::Efficiency,
        Stat::Quality,
        Stat::Communication,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stat::Diagnostic => "Diagnostic",
            Stat::Mechanical => "Mechanical",
            Stat::Efficiency => "Efficiency",
            Stat::Quality => "Quality",
            Stat::Communication => "Communication",
        }
    }
}

pub const STAT_MAX: u32 = 100;

/// A full five-dimensional stat vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StatVector {
    pub diagnostic: u32,
    pub mechanical: u32,
    pub efficiency: u32,
    pub quality: u32,
    pub communication: u32,
}

impl StatVector {
    pub fn new(
        diagnostic: u32,
        mechanical: u32,
        efficiency: u32,
        quality: u32,
        communication: u32,
    ) -> Self {
        Self {
            diagnostic,
            mechanical,
            efficiency,
            quality,
            communication,
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Diagnostic => self.diagnostic,
            Stat::Mechanical => self.mechanical,
            Stat::Efficiency => self.efficiency,
            Stat::Quality => self.quality,
            Stat::Communication => self.communication,
        }
    }

    pub fn set(&mut self, stat: Stat, value: u32) {
        let slot = match stat {
            Stat::Diagnostic => &mut self.diagnostic,
            Stat::Mechanical => &mut self.mechanical,
            Stat::Efficiency => &mut self.efficiency,
            Stat::Quality => &mut self.quality,
            Stat::Communication => &mut self.communication,
        };
        *slot = value;
    }

    /// Values in canonical stat order.
    pub fn iter(&self) -> impl Iterator<Item = (Stat, u32)> + '_ {
        Stat::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, v)| v).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobGroup {
    Maintenance,
    Body,
    Film,
    #[serde(rename = "EV_Future")]
    EvFuture,
    Management,
    Niche,
    NextGen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarketDemand {
    Explosive,
    High,
    Stable,
    Declining,
}

/// Annual salary band in 만원 (10k KRW).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryRange {
    pub min: i64,
    pub max: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub group: JobGroup,
    pub salary_range: SalaryRange,
    pub market_demand: MarketDemand,
    pub required_stats: StatVector,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiring_companies: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    pub prerequisite_jobs: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobTrack {
    Maintenance,
    BodySkin,
    HighTech,
    Management,
    Hybrid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub korean_title: String,
    pub track: JobTrack,
    pub rank: u8,
    pub description: String,
    /// Partial: stats not listed carry no requirement.
    #[serde(default)]
    pub required_stats: BTreeMap<Stat, u32>,
    #[serde(default)]
    pub prerequisite_card_ids: Vec<String>,
    #[serde(default)]
    pub is_hidden: bool,
    pub icon: String,
    pub color: String,
}

/// A repeatable work-log procedure that raises one stat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub stat: Stat,
    pub stat_reward: u32,
    pub mastery_reward: u64,
    #[serde(default)]
    pub requires_photo: bool,
    #[serde(default)]
    pub is_daily: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestCategory {
    Daily,
    Weekly,
    Challenge,
    Special,
}

/// A mission with a cooldown. Unlike tasks, quests are not tied to the
/// calendar day: they come back `cooldown_hours` after the last completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quest {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub target_stat: Stat,
    pub stat_reward: u32,
    pub mastery_reward: u64,
    pub icon: String,
    pub category: QuestCategory,
    #[serde(default)]
    pub requires_photo: bool,
    /// 1 (easy) to 5.
    pub difficulty: u8,
    pub cooldown_hours: u32,
}
