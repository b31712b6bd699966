// File: treasurehunt-core/src/cache/treasure_cache.rs

use std::collections::HashMap;
use std::sync::Arc;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};
use treasurehunt_common::models::TreasureDefinition;
use crate::repositories::TreasureStore;

pub type TreasureSnapshot = HashMap<String, Arc<TreasureDefinition>>;

/// A single-entry write made while a reload was reading the store.
#[derive(Debug, Clone)]
enum Patch {
    Put(Arc<TreasureDefinition>),
    Remove(String),
}

impl Patch {
    fn apply(self, map: &mut TreasureSnapshot) {
        match self {
            Patch::Put(t) => {
                map.insert(t.treasure_id.clone(), t);
            }
            Patch::Remove(id) => {
                map.remove(&id);
            }
        }
    }
}

#[derive(Default)]
struct WriteState {
    /// `Some` while a reload is reading the store.
    journal: Option<Vec<Patch>>,
}

/// In-memory view of every placed treasure, keyed by id.
///
/// Readers load the current snapshot without locking. Writers are serialized
/// by `write_lock`, build a new map and publish it with a single swap, so a
/// reader sees either the old or the new state and never a half-applied one.
///
/// A reload reads the store without holding `write_lock`. Puts and removes
/// that land during that read are journaled and replayed over the fresh list
/// before it is published.
pub struct TreasureCache {
    snap: ArcSwap<TreasureSnapshot>,
    write_lock: Mutex<WriteState>,
    reload_lock: tokio::sync::Mutex<()>,
}

impl Default for TreasureCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Stops journaling when a reload finishes or its future is dropped.
struct JournalGuard<'a> {
    cache: &'a TreasureCache,
}

impl JournalGuard<'_> {
    fn begin(cache: &TreasureCache) -> JournalGuard<'_> {
        cache.write_lock.lock().journal = Some(Vec::new());
        JournalGuard { cache }
    }
}

impl Drop for JournalGuard<'_> {
    fn drop(&mut self) {
        self.cache.write_lock.lock().journal = None;
    }
}

impl TreasureCache {
    pub fn new() -> Self {
        Self {
            snap: ArcSwap::from_pointee(HashMap::new()),
            write_lock: Mutex::new(WriteState::default()),
            reload_lock: tokio::sync::Mutex::new(()),
        }
    }

    /// Replaces the whole cache with the store's current contents.
    ///
    /// If the store cannot be read the previous snapshot is kept and `None` is returned;
    /// otherwise the number of treasures now cached. Writes made while the store
    /// is being read survive the reload.
    pub async fn load(&self, store: &TreasureStore) -> Option<usize> {
        let _reload = self.reload_lock.lock().await;
        let _journal = JournalGuard::begin(self);

        let Some(list) = store.load_all_treasures().await else {
            warn!("Treasure cache refresh failed, keeping {} cached treasures", self.len());
            return None;
        };

        let mut next: TreasureSnapshot = list
            .into_iter()
            .map(|t| (t.treasure_id.clone(), Arc::new(t)))
            .collect();
        let mut state = self.write_lock.lock();
        let patches = state.journal.take().unwrap_or_default();
        if !patches.is_empty() {
            debug!("Replaying {} cache writes made during reload", patches.len());
        }
        for patch in patches {
            patch.apply(&mut next);
        }
        let count = next.len();
        self.snap.store(Arc::new(next));
        drop(state);

        info!("Loaded {} treasures into cache.", count);
        Some(count)
    }

    /// Linear scan; treasure counts are bounded by admin placements.
    pub fn lookup_by_location(&self, world: &str, x: i32, y: i32, z: i32) -> Option<Arc<TreasureDefinition>> {
        self.snap
            .load()
            .values()
            .find(|t| t.is_at(world, x, y, z))
            .cloned()
    }

    pub fn lookup_by_id(&self, treasure_id: &str) -> Option<Arc<TreasureDefinition>> {
        self.snap.load().get(treasure_id).cloned()
    }

    /// Read-only view of the cache at this instant.
    pub fn snapshot(&self) -> Arc<TreasureSnapshot> {
        self.snap.load_full()
    }

    /// Sorted list of cached ids.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.snap.load().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.snap.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts or replaces one entry. Call only after the store confirmed the write.
    pub fn put(&self, treasure: TreasureDefinition) {
        let treasure = Arc::new(treasure);
        let mut state = self.write_lock.lock();
        if let Some(journal) = state.journal.as_mut() {
            journal.push(Patch::Put(Arc::clone(&treasure)));
        }
        let mut next = (**self.snap.load()).clone();
        next.insert(treasure.treasure_id.clone(), treasure);
        self.snap.store(Arc::new(next));
    }

    /// Drops one entry. Call only after the store confirmed the delete.
    pub fn remove(&self, treasure_id: &str) -> Option<Arc<TreasureDefinition>> {
        let mut state = self.write_lock.lock();
        if let Some(journal) = state.journal.as_mut() {
            journal.push(Patch::Remove(treasure_id.to_string()));
        }
        let current = self.snap.load_full();
        if !current.contains_key(treasure_id) {
            return None;
        }
        let mut next = (*current).clone();
        let removed = next.remove(treasure_id);
        self.snap.store(Arc::new(next));
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use treasurehunt_common::models::BlockLocation;
    use crate::test_utils::helpers::create_memory_store;

    fn treasure(id: &str, x: i32) -> TreasureDefinition {
        TreasureDefinition::new(id, BlockLocation::new("world", x, 64, 20), "give %player% diamond 1")
    }

    #[test]
    fn put_then_lookup_by_id_and_location() {
        let cache = TreasureCache::new();
        cache.put(treasure("chest1", 10));

        assert_eq!(cache.lookup_by_id("chest1").map(|t| t.location.x), Some(10));
        assert_eq!(
            cache.lookup_by_location("world", 10, 64, 20).map(|t| t.treasure_id.clone()),
            Some("chest1".to_string())
        );
        assert!(cache.lookup_by_location("world", 11, 64, 20).is_none());
        assert!(cache.lookup_by_location("nether", 10, 64, 20).is_none());
    }

    #[test]
    fn put_with_same_id_moves_the_treasure() {
        let cache = TreasureCache::new();
        cache.put(treasure("chest1", 10));
        cache.put(treasure("chest1", 99));

        assert_eq!(cache.len(), 1);
        assert!(cache.lookup_by_location("world", 10, 64, 20).is_none());
        assert!(cache.lookup_by_location("world", 99, 64, 20).is_some());
    }

    #[test]
    fn snapshot_is_not_affected_by_later_writes() {
        let cache = TreasureCache::new();
        cache.put(treasure("a", 1));
        let before = cache.snapshot();

        cache.put(treasure("b", 2));
        cache.remove("a");

        assert_eq!(before.len(), 1);
        assert!(before.contains_key("a"));
        assert_eq!(cache.ids(), vec!["b".to_string()]);
    }

    #[test]
    fn remove_missing_id_is_a_no_op() {
        let cache = TreasureCache::new();
        cache.put(treasure("a", 1));
        assert!(cache.remove("zzz").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failed_load_keeps_previous_snapshot() {
        tokio_test::block_on(async {
            let store = create_memory_store().await.expect("memory store");
            let cache = TreasureCache::new();
            assert!(store.upsert_treasure(treasure("a", 1)).await);
            assert_eq!(cache.load(&store).await, Some(1));

            store.close().await;
            assert_eq!(cache.load(&store).await, None);
            assert_eq!(cache.ids(), vec!["a".to_string()]);
        });
    }
}
