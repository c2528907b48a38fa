//! Typed client for the recipe backend.
//!
//! Each method describes one endpoint and hands it to the [`Gateway`],
//! which takes care of tokens and session recovery.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::models::{
    Banner, Category, Dish, DishIngredient, DishSort, DishStep, FavoriteToggle, Page, PageQuery,
    UserStats,
};

use super::gateway::Gateway;
use super::request::PendingRequest;
use super::ApiError;

/// Clone is cheap - the gateway shares its HTTP client.
#[derive(Clone)]
pub struct DishApi {
    gateway: Gateway,
}

impl DishApi {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.gateway.send_data(&PendingRequest::get(path)).await
    }

    async fn get_with<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        params: &Q,
    ) -> Result<T, ApiError> {
        let request = PendingRequest::get(path).with_body(params)?;
        self.gateway.send_data(&request).await
    }

    async fn post<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.gateway.send_data(&PendingRequest::post(path)).await
    }

    /// Merge page parameters into an extra parameter object.
    fn paged(query: PageQuery, extra: Value) -> Value {
        let mut params = extra;
        if let Value::Object(ref mut map) = params {
            map.insert("current".to_string(), json!(query.current));
            map.insert("size".to_string(), json!(query.size));
        }
        params
    }

    // ===== Home =====

    pub async fn banners(&self) -> Result<Vec<Banner>, ApiError> {
        let banners: Option<Vec<Banner>> = self.get("/app/banner/list").await?;
        Ok(banners.unwrap_or_default())
    }

    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let categories: Option<Vec<Category>> = self.get("/app/category/list").await?;
        Ok(categories.unwrap_or_default())
    }

    // ===== Dish listings =====

    pub async fn dish_page(&self, params: &Value) -> Result<Page<Dish>, ApiError> {
        let page: Option<Page<Dish>> = self.get_with("/app/dish/page", params).await?;
        Ok(page.unwrap_or_default())
    }

    pub async fn dishes_by_category(
        &self,
        category_id: i64,
        query: PageQuery,
    ) -> Result<Page<Dish>, ApiError> {
        let params = Self::paged(query, json!({ "categoryId": category_id }));
        self.dish_page(&params).await
    }

    pub async fn search(&self, keyword: &str, query: PageQuery) -> Result<Page<Dish>, ApiError> {
        let params = Self::paged(query, json!({ "keyword": keyword }));
        let page: Option<Page<Dish>> = self.get_with("/app/dish/search", &params).await?;
        debug!(keyword = keyword, page = query.current, "Search completed");
        Ok(page.unwrap_or_default())
    }

    pub async fn hot_dishes(&self, query: PageQuery) -> Result<Page<Dish>, ApiError> {
        let page: Option<Page<Dish>> = self.get_with("/app/dish/hot", &query).await?;
        Ok(page.unwrap_or_default())
    }

    pub async fn recommended_dishes(&self, query: PageQuery) -> Result<Page<Dish>, ApiError> {
        let page: Option<Page<Dish>> = self.get_with("/app/dish/recommend", &query).await?;
        Ok(page.unwrap_or_default())
    }

    /// Recommendations derived from the user's viewing history.
    pub async fn personal_recommendations(&self, query: PageQuery) -> Result<Page<Dish>, ApiError> {
        let page: Option<Page<Dish>> = self
            .get_with("/app/dish/personal-recommend", &query)
            .await?;
        Ok(page.unwrap_or_default())
    }

    pub async fn all_dishes(&self, sort: DishSort, query: PageQuery) -> Result<Page<Dish>, ApiError> {
        let params = Self::paged(query, json!({ "sortType": sort.as_param() }));
        let page: Option<Page<Dish>> = self.get_with("/app/dish/all", &params).await?;
        Ok(page.unwrap_or_default())
    }

    // ===== Dish detail =====

    pub async fn dish(&self, id: i64) -> Result<Dish, ApiError> {
        let dish: Option<Dish> = self.get(&format!("/app/dish/{}", id)).await?;
        dish.ok_or_else(|| ApiError::InvalidResponse(format!("Dish {} not found", id)))
    }

    pub async fn dish_steps(&self, dish_id: i64) -> Result<Vec<DishStep>, ApiError> {
        let steps: Option<Vec<DishStep>> =
            self.get(&format!("/app/dish-step/list/{}", dish_id)).await?;
        Ok(steps.unwrap_or_default())
    }

    pub async fn dish_ingredients(&self, dish_id: i64) -> Result<Vec<DishIngredient>, ApiError> {
        let ingredients: Option<Vec<DishIngredient>> = self
            .get(&format!("/app/dish-ingredient/list/{}", dish_id))
            .await?;
        Ok(ingredients.unwrap_or_default())
    }

    // ===== Interactions =====

    pub async fn increase_view_count(&self, dish_id: i64) -> Result<(), ApiError> {
        let _: Value = self.post(&format!("/app/dish/{}/view", dish_id)).await?;
        Ok(())
    }

    /// `Ok(None)` when the backend accepted the toggle without reporting
    /// the new state.
    pub async fn toggle_favorite(&self, dish_id: i64) -> Result<Option<FavoriteToggle>, ApiError> {
        self.post(&format!("/app/dish/{}/favorite", dish_id)).await
    }

    pub async fn record_view_history(&self, dish_id: i64) -> Result<(), ApiError> {
        let _: Value = self
            .post(&format!("/app/dish/{}/view-history", dish_id))
            .await?;
        Ok(())
    }

    // ===== User =====

    pub async fn user_info(&self) -> Result<Value, ApiError> {
        self.get("/app/user/info").await
    }

    pub async fn user_stats(&self) -> Result<UserStats, ApiError> {
        let stats: Option<UserStats> = self.get("/app/user/stats").await?;
        Ok(stats.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paged_merges_params() {
        let params = DishApi::paged(
            PageQuery { current: 3, size: 20 },
            json!({ "categoryId": 5 }),
        );
        assert_eq!(params, json!({ "categoryId": 5, "current": 3, "size": 20 }));
    }
}
