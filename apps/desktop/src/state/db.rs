//! # Database State
//!
//! Wraps the `Database` handle for commands.
//!
//! The pool inside `Database` is thread-safe, so commands query concurrently
//! without locking. The handle is reference-counted because the OTA sync
//! engine holds it too.

use std::sync::Arc;
use swarna_db::Database;

#[derive(Debug, Clone)]
pub struct DbState {
    db: Arc<Database>,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db: Arc::new(db) }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ```rust,ignore
    /// let bookings = db_state.inner().bookings().list_all().await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// A shared handle, for components that outlive one command.
    pub fn shared(&self) -> Arc<Database> {
        Arc::clone(&self.db)
    }
}
