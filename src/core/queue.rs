use std::collections::VecDeque;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    item::FoodItem,
    persist::{KvStore, PersistError, load_json, save_json},
    types::{QueueStatus, keys},
};

use super::catalog::{Catalog, CatalogSource, FetchError};

#[derive(Debug)]
pub enum QueueError {
    /// A fetch is in flight; mutations wait for it.
    FetchInFlight,
    Fetch(FetchError),
    Persist(PersistError),
}

impl From<PersistError> for QueueError {
    fn from(value: PersistError) -> Self {
        Self::Persist(value)
    }
}

impl From<FetchError> for QueueError {
    fn from(value: FetchError) -> Self {
        Self::Fetch(value)
    }
}

/// What `save` does with an id that is already in the saved list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Leave the saved list alone.
    #[default]
    Ignore,
    /// Append another copy.
    Append,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SaveReceipt {
    pub item: FoodItem,
    /// False when the duplicate policy swallowed the save.
    pub appended: bool,
    /// True when the id was missing from the catalog and the caller's copy was kept.
    pub fallback: bool,
}

#[derive(Debug, Default)]
pub struct QueueManager {
    catalog: Catalog,
    saved: Vec<FoodItem>,
    unseen: VecDeque<FoodItem>,
    loading: bool,
    error: Option<FetchError>,
    policy: DuplicatePolicy,
}

impl QueueManager {
    pub fn new(catalog: Catalog, policy: DuplicatePolicy) -> Self {
        Self {
            catalog,
            policy,
            ..Self::default()
        }
    }

    /// Loads the saved list from `store`, reconciled against `catalog`.
    ///
    /// The unseen queue stays empty until the first fetch.
    pub fn restore(
        store: &dyn KvStore,
        catalog: Catalog,
        policy: DuplicatePolicy,
    ) -> Result<Self, PersistError> {
        let stored: Vec<FoodItem> = load_json(store, keys::SAVED_ITEMS)?.unwrap_or_default();
        let saved = catalog.reconcile(stored);
        debug!(saved = saved.len(), "restored saved items");
        Ok(Self {
            saved,
            ..Self::new(catalog, policy)
        })
    }

    pub fn fetch(&mut self, source: &mut dyn CatalogSource) -> Result<usize, QueueError> {
        self.begin_fetch()?;
        let loaded = source.load();
        Ok(self.finish_fetch(loaded)?)
    }

    /// Raises the loading flag and clears any previous fetch error.
    pub fn begin_fetch(&mut self) -> Result<(), QueueError> {
        if self.loading {
            return Err(QueueError::FetchInFlight);
        }
        self.loading = true;
        self.error = None;
        Ok(())
    }

    /// Completes a fetch started with [`Self::begin_fetch`].
    ///
    /// On success the catalog is replaced and the unseen queue rebuilt as
    /// catalog minus saved, in catalog order, one entry per id. On failure nothing but the
    /// error flag changes. Returns the unseen count.
    pub fn finish_fetch(&mut self, loaded: Result<Vec<FoodItem>, FetchError>) -> Result<usize, FetchError> {
        self.loading = false;
        match loaded {
            Ok(items) => {
                let catalog = Catalog::new(items);
                // Seeded with saved ids; repeated catalog ids keep their first copy.
                let mut seen: HashSet<&str> = self.saved.iter().map(|item| item.id.as_str()).collect();
                self.unseen = catalog
                    .items()
                    .iter()
                    .filter(|item| seen.insert(item.id.as_str()))
                    .cloned()
                    .collect();
                drop(seen);
                self.catalog = catalog;
                info!(
                    catalog = self.catalog.len(),
                    unseen = self.unseen.len(),
                    "catalog fetched"
                );
                Ok(self.unseen.len())
            }
            Err(err) => {
                warn!(reason = %err.reason, "catalog fetch failed");
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }

    /// Drops the head of the unseen queue and returns the new head.
    pub fn advance(&mut self) -> Result<Option<&FoodItem>, QueueError> {
        self.ensure_idle()?;
        if let Some(head) = self.unseen.pop_front() {
            debug!(id = %head.id, remaining = self.unseen.len(), "advanced queue");
        }
        Ok(self.unseen.front())
    }

    pub fn skip(&mut self) -> Result<Option<&FoodItem>, QueueError> {
        self.advance()
    }

    /// Saves the catalog's copy of `item` and takes it out of the unseen queue.
    ///
    /// The new saved list is written to `store` before any in-memory state
    /// changes, so a failed write leaves the manager untouched.
    pub fn save(&mut self, store: &mut dyn KvStore, item: &FoodItem) -> Result<SaveReceipt, QueueError> {
        self.ensure_idle()?;

        let (canonical, fallback) = match self.catalog.get(&item.id) {
            Some(found) => (found.clone(), false),
            None => {
                warn!(id = %item.id, "saving item missing from catalog");
                (item.clone(), true)
            }
        };

        let appended = !(self.policy == DuplicatePolicy::Ignore && self.is_saved(&canonical.id));
        if appended {
            let mut next = self.saved.clone();
            next.push(canonical.clone());
            save_json(store, keys::SAVED_ITEMS, &next)?;
            self.saved = next;
        }

        self.take_unseen(&canonical.id);
        info!(id = %canonical.id, name = %canonical.name, appended, "saved item");

        Ok(SaveReceipt {
            item: canonical,
            appended,
            fallback,
        })
    }

    /// Removes the first saved entry with `id` and requeues it at the tail.
    ///
    /// Returns the removed entry, or `None` without touching the store when
    /// nothing matched.
    pub fn remove(&mut self, store: &mut dyn KvStore, id: &str) -> Result<Option<FoodItem>, QueueError> {
        self.ensure_idle()?;

        let Some(pos) = self.saved.iter().position(|item| item.id == id) else {
            return Ok(None);
        };

        let mut next = self.saved.clone();
        let removed = next.remove(pos);
        save_json(store, keys::SAVED_ITEMS, &next)?;
        self.saved = next;

        // A duplicate copy may still be saved; the queue must stay disjoint.
        let requeue = !self.is_saved(id) && !self.unseen.iter().any(|item| item.id == id);
        if requeue {
            if let Some(item) = self.catalog.get(id) {
                self.unseen.push_back(item.clone());
            }
        }
        info!(id, requeue, "removed saved item");

        Ok(Some(removed))
    }

    /// The item awaiting a decision: the head of the unseen queue.
    pub fn current(&self) -> Option<&FoodItem> {
        self.unseen.front()
    }

    pub fn saved(&self) -> &[FoodItem] {
        &self.saved
    }

    pub fn unseen(&self) -> &VecDeque<FoodItem> {
        &self.unseen
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_saved(&self, id: &str) -> bool {
        self.saved.iter().any(|item| item.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn status(&self) -> QueueStatus {
        if self.loading {
            QueueStatus::Loading
        } else if self.error.is_some() {
            QueueStatus::Error
        } else if self.unseen.is_empty() {
            QueueStatus::Empty
        } else {
            QueueStatus::HasItem
        }
    }

    fn ensure_idle(&self) -> Result<(), QueueError> {
        if self.loading {
            return Err(QueueError::FetchInFlight);
        }
        Ok(())
    }

    fn take_unseen(&mut self, id: &str) {
        if let Some(pos) = self.unseen.iter().position(|item| item.id == id) {
            self.unseen.remove(pos);
        }
    }
}
