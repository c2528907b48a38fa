use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::models::{FavoriteItem, ViewHistoryItem};
use crate::store::{keys, KeyValueStore, KeyValueStoreExt};

use super::history::push_front_unique;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryLimits {
    pub favorites: usize,
    pub search_history: usize,
    pub view_history: usize,
}

impl HistoryLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            favorites: config.favorites_limit,
            search_history: config.search_history_limit,
            view_history: config.view_history_limit,
        }
    }
}

impl Default for HistoryLimits {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LocalStats {
    pub favorites: usize,
    pub views: usize,
    pub searches: usize,
}

/// Local mirrors of favorites, search history and view history.
#[derive(Clone)]
pub struct LocalCache {
    store: Arc<dyn KeyValueStore>,
    limits: HistoryLimits,
}

impl LocalCache {
    pub fn new(store: Arc<dyn KeyValueStore>, limits: HistoryLimits) -> Self {
        Self { store, limits }
    }

    /// A list that fails to decode is treated as empty and rewritten on
    /// the next insert.
    fn load_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.store.load::<Vec<T>>(key) {
            Ok(list) => list.unwrap_or_default(),
            Err(e) => {
                warn!(key = key, error = %e, "Discarding unreadable local list");
                Vec::new()
            }
        }
    }

    fn save_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<()> {
        self.store.save(key, list)
    }

    // ===== Favorites =====

    pub fn favorites(&self) -> Vec<FavoriteItem> {
        self.load_list(keys::FAVORITES)
    }

    pub fn is_favorite(&self, dish_id: i64) -> bool {
        self.favorites().iter().any(|f| f.id == dish_id)
    }

    pub fn add_favorite(&self, item: FavoriteItem) -> Result<()> {
        let mut favorites = self.favorites();
        push_front_unique(&mut favorites, item, self.limits.favorites, |f| f.id);
        self.save_list(keys::FAVORITES, &favorites)
    }

    /// Returns the remaining favorites.
    pub fn remove_favorite(&self, dish_id: i64) -> Result<Vec<FavoriteItem>> {
        let mut favorites = self.favorites();
        favorites.retain(|f| f.id != dish_id);
        self.save_list(keys::FAVORITES, &favorites)?;
        Ok(favorites)
    }

    pub fn clear_favorites(&self) -> Result<()> {
        self.store.remove(keys::FAVORITES)
    }

    // ===== Search History =====

    pub fn search_history(&self) -> Vec<String> {
        self.load_list(keys::SEARCH_HISTORY)
    }

    /// Record a keyword as the most recent search. Blank keywords are
    /// ignored. Returns the updated history.
    pub fn add_search(&self, keyword: &str) -> Result<Vec<String>> {
        let mut history = self.search_history();
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(history);
        }
        push_front_unique(
            &mut history,
            keyword.to_string(),
            self.limits.search_history,
            |k| k.clone(),
        );
        self.save_list(keys::SEARCH_HISTORY, &history)?;
        Ok(history)
    }

    pub fn clear_search_history(&self) -> Result<()> {
        self.store.remove(keys::SEARCH_HISTORY)
    }

    // ===== View History =====

    pub fn view_history(&self) -> Vec<ViewHistoryItem> {
        self.load_list(keys::VIEW_HISTORY)
    }

    /// Insert or refresh a viewed dish. A repeat view moves the entry to the
    /// front and bumps its count.
    pub fn record_view(&self, mut item: ViewHistoryItem) -> Result<()> {
        let mut history = self.view_history();
        if let Some(existing) = history.iter().find(|v| v.id == item.id) {
            item.view_count = existing.view_count.saturating_add(1);
        }
        item.view_time = Utc::now();
        debug!(dish_id = item.id, views = item.view_count, "Recording local view");
        push_front_unique(&mut history, item, self.limits.view_history, |v| v.id);
        self.save_list(keys::VIEW_HISTORY, &history)
    }

    pub fn clear_view_history(&self) -> Result<()> {
        self.store.remove(keys::VIEW_HISTORY)
    }

    // ===== Housekeeping =====

    pub fn stats(&self) -> LocalStats {
        LocalStats {
            favorites: self.favorites().len(),
            views: self.view_history().len(),
            searches: self.search_history().len(),
        }
    }

    /// Wipe the whole local store, session included.
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dish;
    use crate::store::MemoryStore;

    fn dish(id: i64) -> Dish {
        Dish {
            id,
            name: format!("dish {}", id),
            image: None,
            description: None,
            difficulty: Some(1),
            cooking_time: Some(10),
            category_id: None,
            category_name: Some("家常菜".to_string()),
            view_count: Some(3),
            collect_count: Some(1),
            create_time: None,
        }
    }

    fn cache_with(limits: HistoryLimits) -> (LocalCache, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (LocalCache::new(store.clone(), limits), store)
    }

    fn cache() -> LocalCache {
        cache_with(HistoryLimits::default()).0
    }

    #[test]
    fn test_favorites_unique_newest_first() {
        let cache = cache();
        cache.add_favorite(FavoriteItem::from_dish(&dish(1), 1)).unwrap();
        cache.add_favorite(FavoriteItem::from_dish(&dish(2), 1)).unwrap();
        cache.add_favorite(FavoriteItem::from_dish(&dish(1), 5)).unwrap();

        let favorites = cache.favorites();
        assert_eq!(favorites.iter().map(|f| f.id).collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(favorites[0].collect_count, 5);
        assert!(cache.is_favorite(2));
    }

    #[test]
    fn test_remove_favorite() {
        let cache = cache();
        cache.add_favorite(FavoriteItem::from_dish(&dish(1), 1)).unwrap();
        let remaining = cache.remove_favorite(1).unwrap();
        assert!(remaining.is_empty());
        assert!(!cache.is_favorite(1));
        // Removing something absent is fine.
        cache.remove_favorite(42).unwrap();
    }

    #[test]
    fn test_favorites_bounded() {
        let (cache, _) = cache_with(HistoryLimits {
            favorites: 3,
            ..HistoryLimits::default()
        });
        for id in 0..10 {
            cache.add_favorite(FavoriteItem::from_dish(&dish(id), 0)).unwrap();
        }
        let ids: Vec<i64> = cache.favorites().iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![9, 8, 7]);
    }

    #[test]
    fn test_search_history_dedup_and_limit() {
        let cache = cache();
        for i in 0..12 {
            cache.add_search(&format!("kw{}", i)).unwrap();
        }
        let history = cache.add_search(" kw5 ").unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0], "kw5");
        assert_eq!(history.iter().filter(|k| *k == "kw5").count(), 1);
        assert_eq!(history[1], "kw11");
    }

    #[test]
    fn test_search_history_ignores_blank() {
        let cache = cache();
        assert!(cache.add_search("   ").unwrap().is_empty());
        assert!(cache.search_history().is_empty());
    }

    #[test]
    fn test_view_history_moves_repeat_to_front_and_counts() {
        let cache = cache();
        cache.record_view(ViewHistoryItem::from_dish(&dish(1))).unwrap();
        cache.record_view(ViewHistoryItem::from_dish(&dish(2))).unwrap();
        cache.record_view(ViewHistoryItem::from_dish(&dish(1))).unwrap();

        let history = cache.view_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id, 1);
        assert_eq!(history[0].view_count, 2);
        assert_eq!(history[1].view_count, 1);
    }

    #[test]
    fn test_view_history_bounded() {
        let (cache, _) = cache_with(HistoryLimits {
            view_history: 5,
            ..HistoryLimits::default()
        });
        for id in 0..8 {
            cache.record_view(ViewHistoryItem::from_dish(&dish(id))).unwrap();
        }
        assert_eq!(cache.view_history().len(), 5);
        assert_eq!(cache.view_history()[0].id, 7);
    }

    #[test]
    fn test_corrupt_list_is_replaced() {
        let (cache, store) = cache_with(HistoryLimits::default());
        store
            .set(keys::SEARCH_HISTORY, &serde_json::json!({"not": "a list"}))
            .unwrap();
        assert!(cache.search_history().is_empty());
        assert_eq!(cache.add_search("粥").unwrap(), vec!["粥".to_string()]);
    }

    #[test]
    fn test_targeted_clears_leave_other_lists() {
        let (cache, store) = cache_with(HistoryLimits::default());
        store.save(keys::TOKEN, "t").unwrap();
        cache.add_favorite(FavoriteItem::from_dish(&dish(1), 1)).unwrap();
        cache.add_search("面").unwrap();
        cache.record_view(ViewHistoryItem::from_dish(&dish(2))).unwrap();

        cache.clear_favorites().unwrap();
        assert!(cache.favorites().is_empty());
        assert_eq!(cache.search_history().len(), 1);
        assert_eq!(cache.view_history().len(), 1);

        cache.clear_search_history().unwrap();
        assert!(cache.search_history().is_empty());
        assert_eq!(cache.view_history().len(), 1);

        cache.clear_view_history().unwrap();
        assert_eq!(cache.stats(), LocalStats::default());
        assert!(store.get(keys::TOKEN).unwrap().is_some());
    }

    #[test]
    fn test_stats_and_clear_all() {
        let cache = cache();
        cache.add_search("鱼").unwrap();
        cache.record_view(ViewHistoryItem::from_dish(&dish(1))).unwrap();
        assert_eq!(
            cache.stats(),
            LocalStats {
                favorites: 0,
                views: 1,
                searches: 1
            }
        );
        cache.clear_all().unwrap();
        assert_eq!(cache.stats(), LocalStats::default());
    }
}
