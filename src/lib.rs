//! Swipe-to-save food discovery sessions with a durable Eat-List.
//!
//! # Examples
//!
//! Driving the queue directly with [`core::queue::QueueManager`]:
//! ```
//! use swipebite::{
//!     core::{
//!         catalog::{Catalog, StaticCatalog},
//!         queue::{DuplicatePolicy, QueueManager},
//!     },
//!     persist::memory::MemoryKvStore,
//! };
//!
//! let mut store = MemoryKvStore::new();
//! let mut source = StaticCatalog::builtin().expect("catalog");
//! let mut queue = QueueManager::new(Catalog::default(), DuplicatePolicy::Ignore);
//! queue.fetch(&mut source).expect("fetch");
//!
//! let first = queue.current().cloned().expect("item");
//! queue.save(&mut store, &first).expect("save");
//! assert_eq!(queue.saved()[0].id, first.id);
//! assert_ne!(queue.current().map(|i| i.id.as_str()), Some(first.id.as_str()));
//! ```
//!
//! Runtime usage with a SQLite store:
//! ```no_run
//! use swipebite::{
//!     persist::sqlite::SqliteKvStore,
//!     runtime::handle::{spawn_session, RuntimeConfig},
//!     session::{Session, SessionConfig},
//!     types::Decision,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let store = SqliteKvStore::open("swipebite.db").expect("open sqlite");
//! let session = Session::open(Box::new(store), SessionConfig::default()).expect("session");
//! let source = Session::builtin_source().expect("catalog");
//! let handle = spawn_session(session, Box::new(source), RuntimeConfig::default());
//! handle.login("adam@example.com", "password123").await.expect("login");
//! handle.decide(Decision::Save).await.expect("save");
//! handle.shutdown().await.expect("shutdown");
//! # }
//! ```

/// Demo authentication and selected city.
pub mod auth;
/// Buddy matches between users.
pub mod buddies;
/// Configuration loading.
pub mod config;
/// Catalog and recommendation queue.
pub mod core;
/// Bundled demo data.
pub mod fixtures;
/// Drag gesture to decision mapping.
pub mod gesture;
/// Food item records.
pub mod item;
/// User-visible notices.
pub mod notice;
/// Key-value persistence abstraction and implementations.
pub mod persist;
/// Single-writer runtime handle and events.
pub mod runtime;
/// Session object owning all mutable state.
pub mod session;
/// Shared primitive types and enums.
pub mod types;
/// User, preference, and match records.
pub mod user;
