//! Event Store - Persistent storage for scheduled division events
//!
//! This crate maps the `events` table onto an in-memory [`Event`] record using
//! Sea-ORM over SQLite. Every loaded event carries two eagerly attached
//! associations: the owning division and the feed items posted against it.
//!
//! # Architecture
//!
//! - **EventStore**: Event lookup, insert-or-update, soft deletion and
//!   read-back of an instance after every write
//! - **DivisionStore**: Resolves an owning-division id to its record
//! - **FeedStore**: Lists the feed items that reference an event
//!
//! All stores share one [`sea_orm::DatabaseConnection`] handed in by the
//! caller. Nothing here opens transactions; a write followed by its read-back
//! is not atomic with respect to other writers.
//!
//! # Database Schema
//!
//! - `divisions`: Owning groups
//! - `events`: Event content, schedule, flags and store-managed timestamps
//! - `feeds`: Feed items keyed by `event_id`
//!
//! Soft-deleted events keep their row with `is_active = 0` and are hidden
//! from lookups unless the caller asks for inactive rows too.
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use event_store::{EventInput, EventStore, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = EventStore::with_config(StoreConfig {
//!     db_path: "events.db".into(),
//!     ..Default::default()
//! })
//! .await?;
//!
//! let mut event = store
//!     .from_input(EventInput::new("Fair", "Annual fair"))
//!     .await?;
//! store.save(&mut event).await?;
//!
//! let found = store.find_by_id(event.id.unwrap_or_default(), false).await?;
//! assert!(found.is_some());
//! # Ok(())
//! # }
//! ```

pub mod division_store;
pub mod entities;
pub mod error;
pub mod event;
pub mod event_store;
pub mod feed_store;
pub mod migration;

pub use division_store::{DivisionInfo, DivisionStore};
pub use error::{Result, StoreError};
pub use event::{Event, EventInput};
pub use event_store::EventStore;
pub use feed_store::{FeedItem, FeedStore};

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::path::PathBuf;
use tracing::info;

/// Current time according to the store, as `YYYY-MM-DD HH:MM:SS.SSS` UTC text
pub(crate) const STORE_NOW: &str = "strftime('%Y-%m-%d %H:%M:%f', 'now')";

const IN_MEMORY: &str = ":memory:";

/// Configuration for the persistence layer
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database file, or `:memory:`
    pub db_path: PathBuf,

    /// Upper bound of pooled connections (default: 5)
    pub max_connections: u32,

    /// Log every SQL statement through sqlx (default: false)
    pub sqlx_logging: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("event-store.db"),
            max_connections: 5,
            sqlx_logging: false,
        }
    }
}

impl StoreConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            db_path: PathBuf::from(IN_MEMORY),
            max_connections: 1,
            ..Default::default()
        }
    }

    fn is_in_memory(&self) -> bool {
        self.db_path.as_os_str() == IN_MEMORY
    }

    /// Connection URL understood by the SQLite driver
    pub fn database_url(&self) -> String {
        if self.is_in_memory() {
            return "sqlite::memory:".to_string();
        }

        let db_path = self.db_path.to_string_lossy().replace('\\', "/");
        format!("sqlite:{}?mode=rwc", db_path)
    }
}

/// Connect to the configured database and bring its schema up to date
pub async fn open_database(config: &StoreConfig) -> Result<DatabaseConnection> {
    let max_connections = if config.is_in_memory() {
        // each pooled connection to `:memory:` is a separate database
        1
    } else {
        config.max_connections.max(1)
    };

    let mut options = ConnectOptions::new(config.database_url());
    options
        .max_connections(max_connections)
        .min_connections(1)
        .sqlx_logging(config.sqlx_logging);

    let db = Database::connect(options).await?;

    migration::Migrator::up(&db, None).await?;

    info!("Event store database ready at {}", config.db_path.display());

    Ok(db)
}
