//! Session-scoped buddy matches between users with shared tastes.

use hashbrown::HashMap;
use tracing::debug;

use crate::{
    fixtures,
    types::UserId,
    user::{FoodPreference, MatchStatus, User, UserMatch},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuddyError {
    UnknownMatch(String),
    /// The match pairs two other users.
    NotParticipant(String),
    /// Only pending matches can be answered.
    AlreadyAnswered(String),
}

/// Match list plus the user and preference lookups needed to render it.
#[derive(Debug, Clone, Default)]
pub struct BuddyBook {
    users: HashMap<UserId, User>,
    preferences: HashMap<UserId, FoodPreference>,
    matches: Vec<UserMatch>,
}

impl BuddyBook {
    pub fn new(
        users: Vec<User>,
        preferences: HashMap<UserId, FoodPreference>,
        matches: Vec<UserMatch>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.id.clone(), u)).collect(),
            preferences,
            matches,
        }
    }

    pub fn builtin() -> Result<Self, serde_json::Error> {
        Ok(Self::new(
            fixtures::users()?,
            fixtures::preferences()?,
            fixtures::matches()?,
        ))
    }

    pub fn matches_for(&self, user_id: &str) -> Vec<&UserMatch> {
        self.matches.iter().filter(|m| m.involves(user_id)).collect()
    }

    pub fn matches_for_cloned(&self, user_id: &str) -> Vec<UserMatch> {
        self.matches_for(user_id).into_iter().cloned().collect()
    }

    /// The user on the other side of `m` from `user_id`.
    pub fn counterpart(&self, m: &UserMatch, user_id: &str) -> Option<&User> {
        self.users.get(m.other_side(user_id))
    }

    pub fn preferences(&self, user_id: &str) -> Option<&FoodPreference> {
        self.preferences.get(user_id)
    }

    /// Accepts a pending match on behalf of `user_id`.
    pub fn accept(&mut self, user_id: &str, match_id: &str) -> Result<&UserMatch, BuddyError> {
        self.answer(user_id, match_id, MatchStatus::Accepted)
    }

    /// Rejects a pending match on behalf of `user_id`.
    pub fn reject(&mut self, user_id: &str, match_id: &str) -> Result<&UserMatch, BuddyError> {
        self.answer(user_id, match_id, MatchStatus::Rejected)
    }

    fn answer(&mut self, user_id: &str, match_id: &str, status: MatchStatus) -> Result<&UserMatch, BuddyError> {
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == match_id)
            .ok_or_else(|| BuddyError::UnknownMatch(match_id.to_string()))?;
        if !m.involves(user_id) {
            return Err(BuddyError::NotParticipant(match_id.to_string()));
        }
        if m.status != MatchStatus::Pending {
            return Err(BuddyError::AlreadyAnswered(match_id.to_string()));
        }
        m.status = status;
        debug!(user_id, match_id, ?status, "match answered");
        Ok(&*m)
    }
}
