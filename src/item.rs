//! Food item and restaurant descriptor records.

use serde::{Deserialize, Serialize};

use crate::types::ItemId;

/// Restaurant details embedded in every [`FoodItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantInfo {
    /// Display name.
    pub name: String,
    /// Street address.
    pub address: String,
    /// Opening hours, free text.
    pub timings: String,
    /// Link to the Zomato listing.
    pub zomato_link: String,
    /// Link to the Google Maps pin.
    pub google_maps_link: String,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
    /// Number of reviews behind `rating`.
    pub review_count: u32,
}

/// Immutable catalog entry shown on a swipe card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodItem {
    /// Unique catalog id.
    pub id: ItemId,
    /// Dish name.
    pub name: String,
    /// Image path or URL.
    #[serde(default)]
    pub image: String,
    /// Dish description.
    pub description: String,
    /// Display price, currency included.
    pub price: String,
    /// Menu category such as "Dessert".
    pub category: String,
    /// Ordered tags.
    pub tags: Vec<String>,
    /// Average rating, 0.0 to 5.0.
    pub rating: f32,
    /// Number of reviews behind `rating`.
    pub review_count: u32,
    /// Allergens present in the dish.
    pub allergies: Vec<String>,
    /// Restaurant serving the dish.
    pub restaurant: RestaurantInfo,
}

impl FoodItem {
    /// Returns true when the dish lists `allergen` (case-insensitive).
    pub fn contains_allergen(&self, allergen: &str) -> bool {
        self.allergies
            .iter()
            .any(|a| a.eq_ignore_ascii_case(allergen))
    }
}
