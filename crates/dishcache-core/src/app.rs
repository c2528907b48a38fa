//! Screen-level flows for the recipe client.
//!
//! `App` wires the API client, the session and the local cache together and
//! exposes the operations a front end needs: home feed, listings with
//! "load more", dish detail, favorites, search and profile.
//!
//! Favorites and view history are written locally as well as to the
//! backend. When the backend call fails the local write still happens, so
//! the UI keeps reflecting what the user did.

use std::sync::Arc;

use anyhow::Result;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{ApiError, DishApi, Gateway};
use crate::auth::{AuthError, LoginProvider, Session};
use crate::cache::{HistoryLimits, LocalCache, LocalStats};
use crate::config::Config;
use crate::models::{
    Banner, Category, Dish, DishIngredient, DishSort, DishStep, FavoriteItem, Page, PageQuery,
    Pager, UserProfile, UserStats, ViewHistoryItem,
};
use crate::notify::Notifier;
use crate::store::{FileStore, KeyValueStore};
use crate::utils::image_url;

/// Number of categories shown on the home screen.
const HOME_CATEGORY_COUNT: usize = 8;

const FAVORITE_ADDED_MESSAGE: &str = "Added to favorites";
const FAVORITE_REMOVED_MESSAGE: &str = "Removed from favorites";

/// A paged dish listing the app knows how to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Listing {
    All(DishSort),
    Category(i64),
    Hot,
    Recommended,
    Personal,
    Search(String),
}

/// Home screen content. A failed dish list leaves `dishes` empty and
/// retryable with `load_more`; banners and categories are still shown.
#[derive(Debug)]
pub struct HomeData {
    pub banners: Vec<Banner>,
    pub categories: Vec<Category>,
    pub dishes: Pager<Dish>,
    pub dishes_error: Option<ApiError>,
}

#[derive(Debug, Clone)]
pub struct DishDetail {
    pub dish: Dish,
    pub steps: Vec<DishStep>,
    pub ingredients: Vec<DishIngredient>,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteOutcome {
    pub is_favorite: bool,
    pub collect_count: i64,
    pub message: String,
    /// False when the backend could not be reached and only the local
    /// mirror was updated.
    pub synced: bool,
}

pub struct App {
    config: Config,
    api: DishApi,
    session: Session,
    cache: LocalCache,
}

impl App {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        login: Arc<dyn LoginProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let session = Session::new(Arc::clone(&store));
        let gateway = Gateway::from_config(&config, session.clone(), login, notifier)?;
        let cache = LocalCache::new(store, HistoryLimits::from_config(&config));

        Ok(Self {
            config,
            api: DishApi::new(gateway),
            session,
            cache,
        })
    }

    /// Open the app on the file store from the configuration.
    pub fn open(
        config: Config,
        login: Arc<dyn LoginProvider>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self> {
        let store = FileStore::new(config.store_dir()?)?;
        debug!(dir = %store.dir().display(), "Opened local store");
        Self::new(config, Arc::new(store), login, notifier)
    }

    pub fn api(&self) -> &DishApi {
        &self.api
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn cache(&self) -> &LocalCache {
        &self.cache
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn new_pager(&self) -> Pager<Dish> {
        Pager::new(self.config.page_size)
    }

    pub fn image_url(&self, path: Option<&str>) -> Option<String> {
        image_url(path, &self.config.base_url)
    }

    // ===== Session =====

    /// Launch-time login: when a profile is cached but no token is stored,
    /// try to establish a session. Failures are only logged.
    pub async fn auto_login(&self) -> bool {
        if self.session.has_token() {
            return true;
        }
        if self.session.profile().is_none() {
            debug!("No cached profile, skipping auto login");
            return false;
        }
        match self.api.gateway().establish_session().await {
            Ok(_) => {
                info!("Auto login succeeded");
                true
            }
            Err(e) => {
                warn!(error = %e, "Auto login failed");
                false
            }
        }
    }

    /// Cache the profile and log in with it.
    pub async fn login(&self, profile: UserProfile) -> Result<(), AuthError> {
        self.session
            .set_profile(&profile)
            .map_err(|e| AuthError::Store(e.to_string()))?;
        self.api.gateway().establish_session().await?;
        info!(user = profile.display_name(), "Logged in");
        Ok(())
    }

    pub fn profile(&self) -> Option<UserProfile> {
        self.session.profile()
    }

    // ===== Listings =====

    pub async fn load_home(&self, sort: DishSort) -> Result<HomeData, ApiError> {
        let (banners, mut categories) =
            futures::try_join!(self.api.banners(), self.api.categories())?;
        categories.truncate(HOME_CATEGORY_COUNT);

        let mut dishes = self.new_pager();
        let dishes_error = match self.load_more(&Listing::All(sort), &mut dishes).await {
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "Home dish list failed to load");
                Some(e)
            }
        };

        Ok(HomeData {
            banners,
            categories,
            dishes,
            dishes_error,
        })
    }

    pub async fn fetch_page(&self, listing: &Listing, query: PageQuery) -> Result<Page<Dish>, ApiError> {
        match listing {
            Listing::All(sort) => self.api.all_dishes(*sort, query).await,
            Listing::Category(id) => self.api.dishes_by_category(*id, query).await,
            Listing::Hot => self.api.hot_dishes(query).await,
            Listing::Recommended => self.api.recommended_dishes(query).await,
            Listing::Personal => self.api.personal_recommendations(query).await,
            Listing::Search(keyword) => self.api.search(keyword, query).await,
        }
    }

    /// Load the next page into `pager`. Returns `Ok(false)` when there was
    /// nothing left to load.
    pub async fn load_more(&self, listing: &Listing, pager: &mut Pager<Dish>) -> Result<bool, ApiError> {
        let Some(query) = pager.next_query() else {
            return Ok(false);
        };
        match self.fetch_page(listing, query).await {
            Ok(page) => {
                pager.apply(page);
                Ok(true)
            }
            Err(e) => {
                pager.fail();
                Err(e)
            }
        }
    }

    /// Run a search. Blank keywords do nothing; a successful search is
    /// remembered in the search history.
    pub async fn search(&self, keyword: &str) -> Result<Option<Pager<Dish>>, ApiError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Ok(None);
        }

        let mut pager = self.new_pager();
        self.load_more(&Listing::Search(keyword.to_string()), &mut pager)
            .await?;

        if let Err(e) = self.cache.add_search(keyword) {
            warn!(error = %e, "Failed to save search history");
        }
        Ok(Some(pager))
    }

    // ===== Dish Detail =====

    pub async fn dish_detail(&self, id: i64) -> Result<DishDetail, ApiError> {
        let (dish, steps, ingredients) = futures::try_join!(
            self.api.dish(id),
            self.api.dish_steps(id),
            self.api.dish_ingredients(id)
        )?;

        Ok(DishDetail {
            dish,
            steps,
            ingredients,
            is_favorite: self.cache.is_favorite(id),
        })
    }

    /// Count a view of `dish`, then record it in the backend's view
    /// history, falling back to the local view history.
    pub async fn record_view(&self, dish: &Dish) -> Result<(), ApiError> {
        self.api.increase_view_count(dish.id).await?;

        if let Err(e) = self.api.record_view_history(dish.id).await {
            debug!(dish_id = dish.id, error = %e, "Backend view history unavailable, recording locally");
            if let Err(e) = self.cache.record_view(ViewHistoryItem::from_dish(dish)) {
                warn!(dish_id = dish.id, error = %e, "Failed to record local view history");
            }
        }
        Ok(())
    }

    // ===== Favorites =====

    /// Toggle a favorite. The backend's answer wins when there is one;
    /// otherwise the local state is flipped. Either way the local mirror is
    /// updated.
    pub async fn toggle_favorite(&self, dish: &Dish) -> FavoriteOutcome {
        let was_favorite = self.cache.is_favorite(dish.id);

        let backend = match self.api.toggle_favorite(dish.id).await {
            Ok(result) => result,
            Err(e) => {
                debug!(dish_id = dish.id, error = %e, "Favorite toggle not synced");
                None
            }
        };

        let outcome = match backend {
            Some(toggle) => FavoriteOutcome {
                is_favorite: toggle.is_favorite,
                collect_count: toggle.collect_count,
                message: toggle
                    .message
                    .unwrap_or_else(|| Self::favorite_message(toggle.is_favorite).to_string()),
                synced: true,
            },
            None => {
                let is_favorite = !was_favorite;
                let count = dish.collect_count.unwrap_or(0);
                let collect_count = if is_favorite {
                    count.saturating_add(1)
                } else {
                    count.saturating_sub(1).max(0)
                };
                FavoriteOutcome {
                    is_favorite,
                    collect_count,
                    message: Self::favorite_message(is_favorite).to_string(),
                    synced: false,
                }
            }
        };

        let stored = if outcome.is_favorite {
            self.cache
                .add_favorite(FavoriteItem::from_dish(dish, outcome.collect_count))
        } else {
            self.cache.remove_favorite(dish.id).map(|_| ())
        };
        if let Err(e) = stored {
            warn!(dish_id = dish.id, error = %e, "Failed to update local favorites");
        }

        outcome
    }

    /// Remove a favorite from the favorites screen. Returns the message to
    /// show and the remaining favorites.
    pub async fn remove_favorite(&self, dish_id: i64) -> (String, Vec<FavoriteItem>) {
        let message = match self.api.toggle_favorite(dish_id).await {
            Ok(Some(toggle)) => toggle.message,
            Ok(None) => None,
            Err(e) => {
                debug!(dish_id = dish_id, error = %e, "Favorite removal not synced");
                None
            }
        };

        let remaining = match self.cache.remove_favorite(dish_id) {
            Ok(remaining) => remaining,
            Err(e) => {
                warn!(dish_id = dish_id, error = %e, "Failed to update local favorites");
                self.cache.favorites()
            }
        };

        (
            message.unwrap_or_else(|| FAVORITE_REMOVED_MESSAGE.to_string()),
            remaining,
        )
    }

    pub fn favorites(&self) -> Vec<FavoriteItem> {
        self.cache.favorites()
    }

    /// Drop every local favorite. The backend is not told.
    pub fn clear_favorites(&self) -> Result<()> {
        self.cache.clear_favorites()?;
        info!("Local favorites cleared");
        Ok(())
    }

    fn favorite_message(is_favorite: bool) -> &'static str {
        if is_favorite {
            FAVORITE_ADDED_MESSAGE
        } else {
            FAVORITE_REMOVED_MESSAGE
        }
    }

    // ===== History =====

    pub fn clear_search_history(&self) -> Result<()> {
        self.cache.clear_search_history()?;
        info!("Search history cleared");
        Ok(())
    }

    pub fn clear_view_history(&self) -> Result<()> {
        self.cache.clear_view_history()?;
        info!("View history cleared");
        Ok(())
    }

    // ===== Profile =====

    pub fn local_stats(&self) -> LocalStats {
        self.cache.stats()
    }

    /// Remote statistics; `None` without a session.
    pub async fn user_stats(&self) -> Result<Option<UserStats>, ApiError> {
        if !self.session.has_token() {
            return Ok(None);
        }
        self.api.user_stats().await.map(Some)
    }

    pub async fn user_info(&self) -> Result<Value, ApiError> {
        self.api.user_info().await
    }

    /// Wipe everything stored locally, including the session.
    pub fn clear_cache(&self) -> Result<()> {
        self.cache.clear_all()?;
        info!("Local cache cleared");
        Ok(())
    }
}
