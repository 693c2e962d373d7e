//! Runtime event stream payloads.

use crate::{notice::Notice, types::ItemId};

/// Events emitted from the single-writer session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A catalog fetch began; decisions wait until it settles.
    FetchStarted,
    /// A catalog fetch finished.
    Fetched {
        /// Items left to decide on.
        unseen: usize,
    },
    /// A catalog fetch failed; prior state is intact.
    FetchFailed,
    /// An item was saved.
    Saved {
        /// Saved item id.
        id: ItemId,
    },
    /// An item was skipped.
    Skipped {
        /// Skipped item id.
        id: ItemId,
    },
    /// An item left the saved list.
    Removed {
        /// Removed item id.
        id: ItemId,
    },
    /// A user logged in.
    LoggedIn {
        /// Username.
        username: String,
    },
    /// A user registered and was logged in.
    Registered {
        /// Username.
        username: String,
    },
    /// Login or registration was rejected.
    AuthFailed,
    /// The user logged out.
    LoggedOut,
    /// A city was selected.
    CitySelected {
        /// City name.
        city: String,
    },
    /// Toast-style message for the presentation layer.
    Notice(Notice),
}
