//! User accounts, taste preferences, and buddy matches.

use serde::{Deserialize, Serialize};

use crate::types::{MatchId, UserId};

/// Demo account record. Passwords are stored as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable user id.
    pub id: UserId,
    /// Display handle.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

/// Preferred heat level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpiceLevel {
    /// Mild.
    Mild,
    /// Medium.
    Medium,
    /// Spicy.
    Spicy,
}

/// Preferred price bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceRange {
    /// Budget.
    Budget,
    /// Moderate.
    Moderate,
    /// Premium.
    Premium,
}

/// Taste profile shown next to a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodPreference {
    /// Favourite cuisines.
    pub cuisine: Vec<String>,
    /// Dietary restrictions such as "Vegan".
    pub dietary_restrictions: Vec<String>,
    /// Heat tolerance.
    pub spice_level: SpiceLevel,
    /// Price bracket.
    pub price_range: PriceRange,
    /// Favourite menu categories.
    pub favorite_categories: Vec<String>,
    /// Favourite restaurant names.
    pub favorite_restaurants: Vec<String>,
}

/// Lifecycle of a buddy match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStatus {
    /// Awaiting a decision.
    Pending,
    /// Accepted; chat is unlocked.
    Accepted,
    /// Rejected.
    Rejected,
}

/// Pairing between two users with shared tastes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMatch {
    /// Match id.
    pub id: MatchId,
    /// One side of the match.
    pub user_id: UserId,
    /// Other side of the match.
    pub matched_user_id: UserId,
    /// Percentage score, 0 to 100.
    pub match_score: u8,
    /// Interests both users share.
    pub common_interests: Vec<String>,
    /// Current status.
    pub status: MatchStatus,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl UserMatch {
    /// Returns true when `user_id` is on either side of the match.
    pub fn involves(&self, user_id: &str) -> bool {
        self.user_id == user_id || self.matched_user_id == user_id
    }

    /// Returns the id of the side that is not `user_id`.
    pub fn other_side(&self, user_id: &str) -> &str {
        if self.user_id == user_id {
            &self.matched_user_id
        } else {
            &self.user_id
        }
    }
}
