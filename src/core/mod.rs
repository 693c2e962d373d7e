//! Catalog, recommendation queue, and index helpers.

/// Read-only item catalog and catalog sources.
pub mod catalog;
/// Helper index aliases.
pub mod indices;
/// Unseen queue and saved-list manager.
pub mod queue;
