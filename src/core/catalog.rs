use std::fmt;

use crate::{fixtures, item::FoodItem};

use super::indices::PosIndex;

/// Catalog load failure. Displays the user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub reason: String,
}

impl FetchError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Failed to fetch food items. Please try again later.")
    }
}

impl std::error::Error for FetchError {}

/// Where [`crate::core::queue::QueueManager::fetch`] gets its items.
pub trait CatalogSource: Send {
    fn load(&mut self) -> Result<Vec<FoodItem>, FetchError>;
}

/// Source that always hands back the same item list.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<FoodItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<FoodItem>) -> Self {
        Self { items }
    }

    /// The bundled Hyderabad catalog.
    pub fn builtin() -> Result<Self, serde_json::Error> {
        Ok(Self::new(fixtures::food_items()?))
    }
}

impl CatalogSource for StaticCatalog {
    fn load(&mut self) -> Result<Vec<FoodItem>, FetchError> {
        Ok(self.items.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Vec<FoodItem>,
    pos: PosIndex,
}

impl Catalog {
    /// Builds a catalog; when ids repeat, the first occurrence is canonical.
    pub fn new(items: Vec<FoodItem>) -> Self {
        let mut pos = PosIndex::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            pos.entry(item.id.clone()).or_insert(idx);
        }
        Self { items, pos }
    }

    pub fn get(&self, id: &str) -> Option<&FoodItem> {
        self.pos.get(id).map(|idx| &self.items[*idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.pos.contains_key(id)
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Swaps each stored copy for the catalog's current copy when one exists.
    pub fn reconcile(&self, stored: Vec<FoodItem>) -> Vec<FoodItem> {
        stored
            .into_iter()
            .map(|item| match self.get(&item.id) {
                Some(canonical) => canonical.clone(),
                None => item,
            })
            .collect()
    }
}
