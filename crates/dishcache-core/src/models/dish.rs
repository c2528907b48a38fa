use serde::{Deserialize, Serialize};

/// Difficulty as reported by the backend (1..=3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Unknown,
}

impl Difficulty {
    pub fn from_level(level: Option<i32>) -> Self {
        match level {
            Some(1) => Difficulty::Easy,
            Some(2) => Difficulty::Medium,
            Some(3) => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Unknown => "Unknown",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub difficulty: Option<i32>,
    /// Minutes.
    #[serde(default)]
    pub cooking_time: Option<i32>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub view_count: Option<i64>,
    #[serde(default)]
    pub collect_count: Option<i64>,
    #[serde(default)]
    pub create_time: Option<String>,
}

impl Dish {
    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_level(self.difficulty)
    }

    pub fn cooking_time_display(&self) -> String {
        match self.cooking_time {
            Some(minutes) if minutes > 0 => format!("{} min", minutes),
            _ => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DishStep {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub dish_id: Option<i64>,
    #[serde(default)]
    pub step_number: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct DishIngredient {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub dish_id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

impl DishIngredient {
    pub fn quantity_display(&self) -> String {
        match (self.amount.as_deref(), self.unit.as_deref()) {
            (Some(amount), Some(unit)) => format!("{}{}", amount, unit),
            (Some(amount), None) => amount.to_string(),
            (None, Some(unit)) => unit.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Backend answer to a favorite toggle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    pub is_favorite: bool,
    #[serde(default)]
    pub collect_count: i64,
    #[serde(default)]
    pub message: Option<String>,
}

/// Ordering for the all-dishes listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DishSort {
    #[default]
    MostCollected,
    MostViewed,
    Latest,
}

impl DishSort {
    pub fn as_param(&self) -> &'static str {
        match self {
            DishSort::MostCollected => "collect",
            DishSort::MostViewed => "view",
            DishSort::Latest => "latest",
        }
    }

    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "collect" => Some(DishSort::MostCollected),
            "view" => Some(DishSort::MostViewed),
            "latest" => Some(DishSort::Latest),
            _ => None,
        }
    }
}

/// Position within a recipe's cooking steps.
#[derive(Debug, Clone, Default)]
pub struct StepCursor {
    steps: Vec<DishStep>,
    index: usize,
}

impl StepCursor {
    /// `None` when there is nothing to cook through.
    pub fn new(steps: Vec<DishStep>) -> Option<Self> {
        if steps.is_empty() {
            None
        } else {
            Some(Self { steps, index: 0 })
        }
    }

    pub fn current(&self) -> &DishStep {
        &self.steps[self.index]
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn next(&mut self) -> bool {
        if self.index + 1 < self.steps.len() {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn prev(&mut self) -> bool {
        if self.index > 0 {
            self.index -= 1;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(n: i32) -> DishStep {
        DishStep {
            id: None,
            dish_id: Some(1),
            step_number: Some(n),
            description: Some(format!("step {}", n)),
            image: None,
        }
    }

    #[test]
    fn test_parse_dish_with_missing_fields() {
        let json = r#"{"id": 7, "name": "宫保鸡丁", "difficulty": 2, "cookingTime": 25, "viewCount": 40}"#;
        let dish: Dish = serde_json::from_str(json).unwrap();
        assert_eq!(dish.difficulty(), Difficulty::Medium);
        assert_eq!(dish.cooking_time_display(), "25 min");
        assert!(dish.collect_count.is_none());
    }

    #[test]
    fn test_difficulty_out_of_range() {
        assert_eq!(Difficulty::from_level(Some(9)), Difficulty::Unknown);
        assert_eq!(Difficulty::from_level(None).display_name(), "Unknown");
    }

    #[test]
    fn test_sort_params() {
        for sort in [DishSort::MostCollected, DishSort::MostViewed, DishSort::Latest] {
            assert_eq!(DishSort::from_param(sort.as_param()), Some(sort));
        }
        assert_eq!(DishSort::from_param("random"), None);
    }

    #[test]
    fn test_step_cursor_stays_in_bounds() {
        assert!(StepCursor::new(vec![]).is_none());

        let mut cursor = StepCursor::new(vec![step(1), step(2)]).unwrap();
        assert!(!cursor.prev());
        assert!(cursor.next());
        assert_eq!(cursor.current().step_number, Some(2));
        assert!(!cursor.next());
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn test_ingredient_quantity() {
        let ing = DishIngredient {
            id: None,
            dish_id: None,
            name: "盐".to_string(),
            amount: Some("5".to_string()),
            unit: Some("g".to_string()),
        };
        assert_eq!(ing.quantity_display(), "5g");
    }
}
