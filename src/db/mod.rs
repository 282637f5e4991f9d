//! Database layer (embedded SQLite).

pub mod sqlite;

pub use sqlite::SqliteDb;

/// Table names as constants.
pub mod tables {
    pub const ACTIVITIES: &str = "activities";
    pub const TOKENS: &str = "tokens";
}
