//! Top-level session object tying the store, queue, auth, and buddies together.

use serde::Deserialize;
use tracing::info;

use crate::{
    auth::{self, AuthError, AuthState},
    buddies::{BuddyBook, BuddyError},
    core::{
        catalog::{Catalog, CatalogSource, FetchError, StaticCatalog},
        queue::{DuplicatePolicy, QueueError, QueueManager, SaveReceipt},
    },
    fixtures,
    gesture::{DEFAULT_SWIPE_THRESHOLD, SwipeTracker},
    item::FoodItem,
    persist::{KvStore, PersistError},
    types::{Decision, QueueStatus},
    user::{User, UserMatch},
};

/// Behavioural knobs for a [`Session`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Handling of repeated saves of one id.
    pub duplicate_policy: DuplicatePolicy,
    /// Drag distance that turns into a decision.
    pub swipe_threshold: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Ignore,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
        }
    }
}

/// Failure of any session operation.
#[derive(Debug)]
pub enum SessionError {
    /// Queue operation failed.
    Queue(QueueError),
    /// Login or registration failed.
    Auth(AuthError),
    /// Match lookup failed.
    Buddy(BuddyError),
    /// Store read or write failed.
    Persist(PersistError),
    /// Bundled data failed to decode.
    Fixture(serde_json::Error),
    /// The operation needs a logged-in user.
    NotAuthenticated,
}

impl From<QueueError> for SessionError {
    fn from(value: QueueError) -> Self {
        Self::Queue(value)
    }
}

impl From<AuthError> for SessionError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}

impl From<BuddyError> for SessionError {
    fn from(value: BuddyError) -> Self {
        Self::Buddy(value)
    }
}

impl From<PersistError> for SessionError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(value: serde_json::Error) -> Self {
        Self::Fixture(value)
    }
}

/// Result of applying a swipe decision to the current item.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// The current item was saved.
    Saved(SaveReceipt),
    /// The current item was skipped.
    Skipped(FoodItem),
}

/// One user's session: every piece of mutable state lives here.
pub struct Session {
    store: Box<dyn KvStore>,
    queue: QueueManager,
    auth: AuthState,
    buddies: BuddyBook,
    config: SessionConfig,
}

impl Session {
    /// Opens a session over `store` with the bundled catalog and demo data.
    pub fn open(store: Box<dyn KvStore>, config: SessionConfig) -> Result<Self, SessionError> {
        let catalog = Catalog::new(fixtures::food_items()?);
        let demo_users = fixtures::users()?;
        let buddies = BuddyBook::builtin()?;
        Ok(Self::with_parts(store, catalog, demo_users, buddies, config)?)
    }

    /// Opens a session with caller-provided reference data.
    ///
    /// `catalog` is what saved items are reconciled against before the first fetch.
    pub fn with_parts(
        store: Box<dyn KvStore>,
        catalog: Catalog,
        demo_users: Vec<User>,
        buddies: BuddyBook,
        config: SessionConfig,
    ) -> Result<Self, PersistError> {
        let queue = QueueManager::restore(store.as_ref(), catalog, config.duplicate_policy)?;
        let auth = AuthState::restore(store.as_ref(), demo_users)?;
        info!(
            saved = queue.saved().len(),
            authenticated = auth.is_authenticated(),
            "session opened"
        );
        Ok(Self {
            store,
            queue,
            auth,
            buddies,
            config,
        })
    }

    /// A source serving the bundled catalog.
    pub fn builtin_source() -> Result<StaticCatalog, SessionError> {
        Ok(StaticCatalog::builtin()?)
    }

    pub fn fetch(&mut self, source: &mut dyn CatalogSource) -> Result<usize, QueueError> {
        self.queue.fetch(source)
    }

    pub fn begin_fetch(&mut self) -> Result<(), QueueError> {
        self.queue.begin_fetch()
    }

    pub fn finish_fetch(&mut self, loaded: Result<Vec<FoodItem>, FetchError>) -> Result<usize, FetchError> {
        self.queue.finish_fetch(loaded)
    }

    pub fn save(&mut self, item: &FoodItem) -> Result<SaveReceipt, QueueError> {
        self.queue.save(self.store.as_mut(), item)
    }

    /// Saves whatever is current; `None` when the queue is empty.
    pub fn save_current(&mut self) -> Result<Option<SaveReceipt>, QueueError> {
        let Some(item) = self.queue.current().cloned() else {
            return Ok(None);
        };
        self.save(&item).map(Some)
    }

    /// Skips the current item and returns it.
    pub fn skip(&mut self) -> Result<Option<FoodItem>, QueueError> {
        let skipped = self.queue.current().cloned();
        self.queue.skip()?;
        Ok(skipped)
    }

    pub fn remove(&mut self, item_id: &str) -> Result<Option<FoodItem>, QueueError> {
        self.queue.remove(self.store.as_mut(), item_id)
    }

    /// Routes a gesture outcome to `save_current` or `skip`.
    pub fn apply_decision(&mut self, decision: Decision) -> Result<Option<Applied>, QueueError> {
        match decision {
            Decision::Save => Ok(self.save_current()?.map(Applied::Saved)),
            Decision::Skip => Ok(self.skip()?.map(Applied::Skipped)),
        }
    }

    pub fn swipe_tracker(&self) -> SwipeTracker {
        SwipeTracker::new(self.config.swipe_threshold)
    }

    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        self.auth.login(self.store.as_mut(), email, password)
    }

    pub fn register(&mut self, username: &str, email: &str, password: &str) -> Result<User, AuthError> {
        self.auth.register(self.store.as_mut(), username, email, password)
    }

    /// Registers from a sign-up form that repeats the password.
    pub fn sign_up(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<User, AuthError> {
        auth::check_sign_up(username, email, password, confirm)?;
        self.register(username, email, password)
    }

    pub fn logout(&mut self) -> Result<(), PersistError> {
        self.auth.logout(self.store.as_mut())
    }

    pub fn select_city(&mut self, city: &str) -> Result<(), PersistError> {
        self.auth.select_city(self.store.as_mut(), city)
    }

    /// Matches involving the logged-in user.
    pub fn matches(&self) -> Result<Vec<UserMatch>, SessionError> {
        let user = self.auth.user().ok_or(SessionError::NotAuthenticated)?;
        Ok(self.buddies.matches_for_cloned(&user.id))
    }

    /// Accepts one of the logged-in user's pending matches.
    pub fn accept_match(&mut self, match_id: &str) -> Result<UserMatch, SessionError> {
        let user = self.auth.user().ok_or(SessionError::NotAuthenticated)?;
        Ok(self.buddies.accept(&user.id, match_id)?.clone())
    }

    /// Rejects one of the logged-in user's pending matches.
    pub fn reject_match(&mut self, match_id: &str) -> Result<UserMatch, SessionError> {
        let user = self.auth.user().ok_or(SessionError::NotAuthenticated)?;
        Ok(self.buddies.reject(&user.id, match_id)?.clone())
    }

    pub fn current(&self) -> Option<&FoodItem> {
        self.queue.current()
    }

    pub fn saved(&self) -> &[FoodItem] {
        self.queue.saved()
    }

    pub fn status(&self) -> QueueStatus {
        self.queue.status()
    }

    pub fn queue(&self) -> &QueueManager {
        &self.queue
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn buddies(&self) -> &BuddyBook {
        &self.buddies
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn KvStore {
        self.store.as_ref()
    }
}
