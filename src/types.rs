//! Shared primitive IDs, storage keys, and swipe decision enums.

use serde::{Deserialize, Serialize};

/// Catalog item identifier.
pub type ItemId = String;
/// User identifier.
pub type UserId = String;
/// Match identifier.
pub type MatchId = String;

/// Key names used in the persistent key-value store.
pub mod keys {
    /// Ordered JSON array of saved food items.
    pub const SAVED_ITEMS: &str = "saved-items";
    /// JSON record of the logged-in user.
    pub const CURRENT_USER: &str = "current-user";
    /// JSON string naming the selected city.
    pub const SELECTED_CITY: &str = "selected-city";
    /// JSON array of users registered on this device.
    pub const ALL_USERS: &str = "all-users";
}

/// Outcome of a swipe on the current item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Keep the item in the Eat-List.
    Save,
    /// Pass on the item.
    Skip,
}

/// Observable state of the recommendation queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueStatus {
    /// A catalog fetch is in flight.
    Loading,
    /// An item is ready for a decision.
    HasItem,
    /// Nothing left to decide.
    Empty,
    /// The last fetch failed; prior state is retained.
    Error,
}
