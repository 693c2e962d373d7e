//! Built-in demo data compiled into the crate.

use hashbrown::HashMap;

use crate::{
    item::FoodItem,
    types::UserId,
    user::{FoodPreference, User, UserMatch},
};

/// Decodes the bundled Hyderabad food catalog.
pub fn food_items() -> Result<Vec<FoodItem>, serde_json::Error> {
    serde_json::from_str(include_str!("fixtures/catalog.json"))
}

/// Decodes the bundled demo accounts.
pub fn users() -> Result<Vec<User>, serde_json::Error> {
    serde_json::from_str(include_str!("fixtures/users.json"))
}

/// Decodes the bundled taste profiles keyed by user id.
pub fn preferences() -> Result<HashMap<UserId, FoodPreference>, serde_json::Error> {
    serde_json::from_str(include_str!("fixtures/preferences.json"))
}

/// Decodes the bundled buddy matches.
pub fn matches() -> Result<Vec<UserMatch>, serde_json::Error> {
    serde_json::from_str(include_str!("fixtures/matches.json"))
}
