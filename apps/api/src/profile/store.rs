use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use crate::catalog::models::StatVector;
use crate::profile::models::{ClassTier, UserProfile};

pub const DEMO_PROFILE_ID: i64 = 1;

/// In-process session store for player profiles. Nothing here survives a
/// restart.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<i64, UserProfile>>,
}

impl ProfileStore {
    /// Store holding the single demo mechanic used by the front end.
    pub fn seeded() -> Self {
        let mut demo = UserProfile::new(DEMO_PROFILE_ID, "김정비", StatVector::new(45, 60, 35, 25, 30));
        demo.mastery = 350;
        demo.class_tier = ClassTier::for_mastery(demo.mastery);
        demo.unlocked_card_ids = vec!["maint_1".into(), "body_1".into(), "tech_1".into()];

        info!("Seeded demo profile {} ({})", demo.id, demo.name);
        Self {
            profiles: RwLock::new(HashMap::from([(demo.id, demo)])),
        }
    }

    pub async fn get(&self, id: i64) -> Option<UserProfile> {
        self.profiles.read().await.get(&id).cloned()
    }

    /// Runs `f` against the stored profile under the write lock. Returns `None`
    /// when the profile does not exist. Changes made by `f` are kept even if it
    /// returns an error, so callers mutate only once validation has passed.
    pub async fn update<T, F>(&self, id: i64, f: F) -> Option<T>
    where
        F: FnOnce(&mut UserProfile) -> T,
    {
        let mut profiles = self.profiles.write().await;
        profiles.get_mut(&id).map(f)
    }
}
