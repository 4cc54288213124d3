//! Card unlock rules for the skill tree.
//!
//! A card is unlockable when every listed stat threshold is met and every
//! prerequisite card is already unlocked. There is no partial credit.
//! Unlocking is explicit and permanent.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::models::{JobCard, Stat};
use crate::profile::models::UserProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CardState {
    Locked,
    Unlockable,
    Unlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatDeficit {
    pub stat: Stat,
    pub required: u32,
    pub current: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnmetRequirements {
    pub stats: Vec<StatDeficit>,
    pub missing_cards: Vec<String>,
}

impl fmt::Display for UnmetRequirements {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self
            .stats
            .iter()
            .map(|d| format!("{} {}/{}", d.stat.as_str(), d.current, d.required))
            .collect();
        if !self.missing_cards.is_empty() {
            parts.push(format!("missing cards {}", self.missing_cards.join(", ")));
        }
        f.write_str(&parts.join("; "))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockOutcome {
    Unlocked,
    /// Eligibility was bypassed with `force`.
    ForceUnlocked,
    AlreadyUnlocked,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnlockError {
    #[error("card '{card_id}' is not unlockable yet")]
    Ineligible {
        card_id: String,
        unmet: UnmetRequirements,
    },
}

pub fn unmet_requirements(card: &JobCard, profile: &UserProfile) -> UnmetRequirements {
    let stats = card
        .required_stats
        .iter()
        .filter_map(|(&stat, &required)| {
            let current = profile.stats.get(stat);
            (current < required).then_some(StatDeficit {
                stat,
                required,
                current,
            })
        })
        .collect();

    let missing_cards = card
        .prerequisite_card_ids
        .iter()
        .filter(|id| !profile.has_unlocked(id))
        .cloned()
        .collect();

    UnmetRequirements {
        stats,
        missing_cards,
    }
}

/// Re-evaluated on every call; already-unlocked cards get no special treatment.
pub fn is_unlockable(card: &JobCard, profile: &UserProfile) -> bool {
    let stats_met = card
        .required_stats
        .iter()
        .all(|(&stat, &required)| profile.stats.get(stat) >= required);
    stats_met
        && card
            .prerequisite_card_ids
            .iter()
            .all(|id| profile.has_unlocked(id))
}

pub fn card_state(card: &JobCard, profile: &UserProfile) -> CardState {
    if profile.has_unlocked(&card.id) {
        CardState::Unlocked
    } else if is_unlockable(card, profile) {
        CardState::Unlockable
    } else {
        CardState::Locked
    }
}

/// Adds `card` to the profile's unlocked set. Eligibility is re-checked unless
/// `force` is set (admin overrides).
pub fn unlock(
    card: &JobCard,
    profile: &mut UserProfile,
    force: bool,
) -> Result<UnlockOutcome, UnlockError> {
    if profile.has_unlocked(&card.id) {
        return Ok(UnlockOutcome::AlreadyUnlocked);
    }

    let outcome = if is_unlockable(card, profile) {
        UnlockOutcome::Unlocked
    } else if force {
        warn!(
            "Force-unlocking card {} for profile {} without meeting requirements",
            card.id, profile.id
        );
        UnlockOutcome::ForceUnlocked
    } else {
        return Err(UnlockError::Ineligible {
            card_id: card.id.clone(),
            unmet: unmet_requirements(card, profile),
        });
    };

    profile.unlocked_card_ids.push(card.id.clone());
    info!("Profile {} unlocked card {}", profile.id, card.id);
    Ok(outcome)
}
