//! User-visible confirmation and error messages.

use serde::{Deserialize, Serialize};

use crate::{auth::AuthError, core::catalog::FetchError, item::FoodItem, user::User};

/// How a notice should be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Informational.
    Info,
    /// Destructive or failed action.
    Error,
}

/// Short toast-style message for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    /// Headline.
    pub title: String,
    /// Body text.
    pub description: String,
    /// Styling hint.
    pub severity: Severity,
}

impl Notice {
    fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    fn error(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            description: description.into(),
            severity: Severity::Error,
        }
    }

    /// Confirms an item went into the Eat-List.
    pub fn saved(item: &FoodItem) -> Self {
        Self::info("Food item saved", format!("{} added to your Eat-List", item.name))
    }

    /// Repeated save of an item the Eat-List already holds.
    pub fn already_saved(item: &FoodItem) -> Self {
        Self::info("Already saved", format!("{} is already in your Eat-List", item.name))
    }

    /// Confirms an item left the Eat-List.
    pub fn removed() -> Self {
        Self::info("Food item removed", "Food item removed from your Eat-List")
    }

    /// Reports a failed catalog fetch.
    pub fn fetch_failed(_err: &FetchError) -> Self {
        Self::error("Error", "Failed to fetch food items")
    }

    /// Greets a returning user.
    pub fn logged_in(user: &User) -> Self {
        Self::info("Login successful", format!("Welcome back, {}!", user.username))
    }

    /// Greets a new user.
    pub fn registered(user: &User) -> Self {
        Self::info(
            "Registration successful",
            format!("Welcome to Swipe N' Bite, {}!", user.username),
        )
    }

    /// Confirms logout.
    pub fn logged_out() -> Self {
        Self::info("Logged out", "You have been logged out successfully")
    }

    /// Reports a failed login.
    pub fn login_failed(err: &AuthError) -> Self {
        Self::error("Login failed", err.to_string())
    }

    /// Reports a failed registration.
    pub fn registration_failed(err: &AuthError) -> Self {
        Self::error("Registration failed", err.to_string())
    }
}
