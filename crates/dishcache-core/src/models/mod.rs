//! Data models for the recipe backend.
//!
//! - `Dish`, `DishStep`, `DishIngredient`: recipe content
//! - `Banner`, `Category`: home screen catalog
//! - `UserProfile`, `UserStats`, `LoginResult`: account data
//! - `Page`, `Pager`: paged listings
//! - `FavoriteItem`, `ViewHistoryItem`: local mirror entries

pub mod catalog;
pub mod dish;
pub mod history;
pub mod page;
pub mod user;

pub use catalog::{Banner, Category};
pub use dish::{Difficulty, Dish, DishIngredient, DishSort, DishStep, FavoriteToggle, StepCursor};
pub use history::{FavoriteItem, ViewHistoryItem};
pub use page::{Page, PageQuery, Pager, DEFAULT_PAGE_SIZE};
pub use user::{LoginResult, UserProfile, UserStats};
