// Skill tree: card states for a profile, explicit unlocks, and the
// "what just became available" diff reported after progression.

pub mod handlers;
pub mod unlock;

use serde::Serialize;

use crate::catalog::models::{JobCard, JobTrack};
use crate::catalog::Catalog;
use crate::profile::models::UserProfile;
use crate::skills::unlock::{card_state, unmet_requirements, CardState, UnmetRequirements};

const HIDDEN_TITLE: &str = "???";

/// One node of a profile's skill tree as the client renders it.
#[derive(Debug, Clone, Serialize)]
pub struct CardNode {
    pub id: String,
    pub track: JobTrack,
    pub rank: u8,
    pub title: String,
    pub korean_title: String,
    pub description: Option<String>,
    pub icon: String,
    pub color: String,
    pub is_hidden: bool,
    pub prerequisite_card_ids: Vec<String>,
    pub state: CardState,
    pub unmet: UnmetRequirements,
}

impl CardNode {
    fn build(card: &JobCard, profile: &UserProfile) -> Self {
        let state = card_state(card, profile);
        let masked = card.is_hidden && state != CardState::Unlocked;
        let unmet = match state {
            CardState::Locked => unmet_requirements(card, profile),
            _ => UnmetRequirements::default(),
        };

        Self {
            id: card.id.clone(),
            track: card.track,
            rank: card.rank,
            title: if masked { HIDDEN_TITLE.to_string() } else { card.title.clone() },
            korean_title: if masked {
                HIDDEN_TITLE.to_string()
            } else {
                card.korean_title.clone()
            },
            description: (!masked).then(|| card.description.clone()),
            icon: card.icon.clone(),
            color: card.color.clone(),
            is_hidden: card.is_hidden,
            prerequisite_card_ids: card.prerequisite_card_ids.clone(),
            state,
            unmet,
        }
    }
}

/// Every card with its current state, in catalog order.
pub fn skill_tree(catalog: &Catalog, profile: &UserProfile) -> Vec<CardNode> {
    catalog
        .cards()
        .iter()
        .map(|card| CardNode::build(card, profile))
        .collect()
}

pub fn cards_by_track(catalog: &Catalog, track: JobTrack) -> Vec<&JobCard> {
    let mut cards: Vec<&JobCard> = catalog.cards().iter().filter(|c| c.track == track).collect();
    cards.sort_by_key(|c| c.rank);
    cards
}

/// Ids of cards that were Locked for `before` and are Unlockable for `after`.
pub fn newly_unlockable(catalog: &Catalog, before: &UserProfile, after: &UserProfile) -> Vec<String> {
    catalog
        .cards()
        .iter()
        .filter(|card| {
            card_state(card, before) == CardState::Locked
                && card_state(card, after) == CardState::Unlockable
        })
        .map(|card| card.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{Stat, StatVector};
    use crate::catalog::test_support::card;

    fn tree_catalog() -> Catalog {
        let mut secret = card("secret", &[(Stat::Quality, 90)], &["base"]);
        secret.is_hidden = true;
        secret.rank = 4;
        let mut mid = card("mid", &[(Stat::Mechanical, 40)], &["base"]);
        mid.rank = 2;
        Catalog::from_parts(vec![], vec![secret, mid, card("base", &[], &[])], vec![]).unwrap()
    }

    fn profile(stats: StatVector, unlocked: &[&str]) -> UserProfile {
        let mut p = UserProfile::new(7, "tester", stats);
        p.unlocked_card_ids = unlocked.iter().map(|s| s.to_string()).collect();
        p
    }

    #[test]
    fn test_skill_tree_states() {
        let catalog = tree_catalog();
        let p = profile(StatVector::new(0, 40, 0, 0, 0), &["base"]);
        let tree = skill_tree(&catalog, &p);
        let state = |id: &str| tree.iter().find(|n| n.id == id).unwrap().state;
        assert_eq!(state("base"), CardState::Unlocked);
        assert_eq!(state("mid"), CardState::Unlockable);
        assert_eq!(state("secret"), CardState::Locked);
    }

    #[test]
    fn test_hidden_card_masked_until_unlocked() {
        let catalog = tree_catalog();
        let p = profile(StatVector::default(), &["base"]);
        let node = skill_tree(&catalog, &p)
            .into_iter()
            .find(|n| n.id == "secret")
            .unwrap();
        assert_eq!(node.title, "???");
        assert_eq!(node.description, None);
        assert_eq!(node.unmet.stats.len(), 1);

        let p = profile(StatVector::default(), &["base", "secret"]);
        let node = skill_tree(&catalog, &p)
            .into_iter()
            .find(|n| n.id == "secret")
            .unwrap();
        assert_eq!(node.title, "Card secret");
        assert!(node.description.is_some());
    }

    #[test]
    fn test_cards_by_track_sorted_by_rank() {
        let catalog = Catalog::load_embedded().unwrap();
        let cards = cards_by_track(&catalog, JobTrack::Maintenance);
        assert!(!cards.is_empty());
        assert!(cards.windows(2).all(|w| w[0].rank <= w[1].rank));
        assert!(cards.iter().all(|c| c.track == JobTrack::Maintenance));
    }

    #[test]
    fn test_newly_unlockable_diff() {
        let catalog = tree_catalog();
        let before = profile(StatVector::new(0, 39, 0, 0, 0), &["base"]);
        let after = profile(StatVector::new(0, 40, 0, 0, 0), &["base"]);
        assert_eq!(newly_unlockable(&catalog, &before, &after), vec!["mid"]);
        assert!(newly_unlockable(&catalog, &after, &after).is_empty());
    }
}
