//! Items kept in the local favorites and view-history mirrors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Dish;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct FavoriteItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub cooking_time: Option<i32>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub collect_count: i64,
    pub create_time: DateTime<Utc>,
}

impl FavoriteItem {
    pub fn from_dish(dish: &Dish, collect_count: i64) -> Self {
        Self {
            id: dish.id,
            name: dish.name.clone(),
            image: dish.image.clone(),
            description: dish.description.clone(),
            difficulty: dish.difficulty,
            cooking_time: dish.cooking_time,
            category_name: dish.category_name.clone(),
            view_count: dish.view_count,
            collect_count,
            create_time: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct ViewHistoryItem {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    #[serde(default)]
    pub cooking_time: Option<i32>,
    #[serde(default)]
    pub category_name: Option<String>,
    pub view_time: DateTime<Utc>,
    #[serde(default)]
    pub view_count: u32,
}

impl ViewHistoryItem {
    pub fn from_dish(dish: &Dish) -> Self {
        Self {
            id: dish.id,
            name: dish.name.clone(),
            image: dish.image.clone(),
            description: dish.description.clone(),
            difficulty: dish.difficulty,
            cooking_time: dish.cooking_time,
            category_name: dish.category_name.clone(),
            view_time: Utc::now(),
            view_count: 1,
        }
    }
}
