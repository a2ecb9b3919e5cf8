//! Session favorites (in memory, not persisted)

use std::collections::BTreeSet;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct Favorites {
    ids: RwLock<BTreeSet<u32>>,
}

impl Favorites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the favorite flag of an artist; returns the new state
    pub async fn toggle(&self, artist_id: u32) -> bool {
        let mut ids = self.ids.write().await;
        if ids.remove(&artist_id) {
            false
        } else {
            ids.insert(artist_id);
            true
        }
    }

    pub async fn is_favorite(&self, artist_id: u32) -> bool {
        self.ids.read().await.contains(&artist_id)
    }

    /// Favorite artist ids in ascending order
    pub async fn list(&self) -> Vec<u32> {
        self.ids.read().await.iter().copied().collect()
    }
}
