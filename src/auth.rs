//! Demo authentication and selected-city state.
//!
//! Credentials are compared in plaintext against users registered on this
//! device (`all-users`) and the bundled demo accounts.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{info, warn};

use crate::{
    persist::{KvStore, PersistError, load_json, save_json},
    types::keys,
    user::User,
};

/// Shortest password accepted by `register`.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials,
    EmailTaken,
    MissingFields,
    PasswordMismatch,
    PasswordTooShort,
    Persist(PersistError),
}

impl From<PersistError> for AuthError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCredentials => f.write_str("Invalid email or password"),
            Self::EmailTaken => f.write_str("Email already exists"),
            Self::MissingFields => f.write_str("Please fill in all fields"),
            Self::PasswordMismatch => f.write_str("Passwords do not match"),
            Self::PasswordTooShort => write!(f, "Password must be at least {MIN_PASSWORD_LEN} characters"),
            Self::Persist(err) => write!(f, "storage error: {err:?}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Logged-in user and selected city for one session.
#[derive(Debug, Clone, Default)]
pub struct AuthState {
    user: Option<User>,
    city: Option<String>,
    demo_users: Vec<User>,
}

impl AuthState {
    pub fn new(demo_users: Vec<User>) -> Self {
        Self {
            demo_users,
            ..Self::default()
        }
    }

    /// Picks up a user and city persisted by an earlier session.
    pub fn restore(store: &dyn KvStore, demo_users: Vec<User>) -> Result<Self, PersistError> {
        Ok(Self {
            user: load_json(store, keys::CURRENT_USER)?,
            city: load_json(store, keys::SELECTED_CITY)?,
            demo_users,
        })
    }

    /// Writes `current-user` only when a user matches both fields.
    pub fn login(&mut self, store: &mut dyn KvStore, email: &str, password: &str) -> Result<User, AuthError> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }

        let registered = registered_users(store)?;
        let found = registered
            .into_iter()
            .chain(self.demo_users.iter().cloned())
            .find(|u| u.email == email && u.password == password);

        let Some(user) = found else {
            warn!(email, "login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        save_json(store, keys::CURRENT_USER, &user)?;
        info!(user_id = %user.id, username = %user.username, "logged in");
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Creates an account, appends it to `all-users`, and logs it in.
    pub fn register(
        &mut self,
        store: &mut dyn KvStore,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(AuthError::MissingFields);
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::PasswordTooShort);
        }

        let previous = store.get(keys::ALL_USERS)?;
        let mut registered = registered_users(store)?;
        let taken = registered
            .iter()
            .chain(self.demo_users.iter())
            .any(|u| u.email == email);
        if taken {
            warn!(email, "registration rejected: email exists");
            return Err(AuthError::EmailTaken);
        }

        let mut stamp = now_ms();
        while registered
            .iter()
            .chain(self.demo_users.iter())
            .any(|u| u.id == stamp.to_string())
        {
            stamp += 1;
        }

        let user = User {
            id: stamp.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        registered.push(user.clone());
        save_json(store, keys::ALL_USERS, &registered)?;
        if let Err(err) = save_json(store, keys::CURRENT_USER, &user) {
            let rollback = match &previous {
                Some(raw) => store.set(keys::ALL_USERS, raw),
                None => store.remove(keys::ALL_USERS),
            };
            if let Err(rollback_err) = rollback {
                warn!(?rollback_err, "could not roll back all-users");
            }
            return Err(err.into());
        }

        info!(user_id = %user.id, username = %user.username, "registered");
        self.user = Some(user.clone());
        Ok(user)
    }

    /// Forgets the user and the city, in memory and in the store.
    pub fn logout(&mut self, store: &mut dyn KvStore) -> Result<(), PersistError> {
        store.remove(keys::CURRENT_USER)?;
        store.remove(keys::SELECTED_CITY)?;
        if let Some(user) = self.user.take() {
            info!(user_id = %user.id, "logged out");
        }
        self.city = None;
        Ok(())
    }

    pub fn select_city(&mut self, store: &mut dyn KvStore, city: &str) -> Result<(), PersistError> {
        save_json(store, keys::SELECTED_CITY, city)?;
        self.city = Some(city.to_string());
        Ok(())
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn selected_city(&self) -> Option<&str> {
        self.city.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn demo_users(&self) -> &[User] {
        &self.demo_users
    }
}

/// Checks a sign-up form before it reaches [`AuthState::register`].
///
/// Order matches the form: missing fields, then mismatch, then length.
pub fn check_sign_up(username: &str, email: &str, password: &str, confirm: &str) -> Result<(), AuthError> {
    if username.is_empty() || email.is_empty() || password.is_empty() || confirm.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if password != confirm {
        return Err(AuthError::PasswordMismatch);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::PasswordTooShort);
    }
    Ok(())
}

fn registered_users(store: &dyn KvStore) -> Result<Vec<User>, PersistError> {
    Ok(load_json(store, keys::ALL_USERS)?.unwrap_or_default())
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
