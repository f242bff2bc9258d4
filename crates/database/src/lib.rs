//! SQLite persistence layer for Connect for Peace.
//!
//! This crate provides async database operations for users, actions,
//! resources, stories, comments, notifications, reminders and reports using
//! SQLx with SQLite, plus the location queries behind map search.
//!
//! # Example
//!
//! ```no_run
//! use database::{action, models::NewAction, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:connect_for_peace.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Submit an action for review
//!     let action = NewAction {
//!         user_id: 1,
//!         title: "Neighbourhood peace walk".to_string(),
//!         country: "Kenya".to_string(),
//!         ..Default::default()
//!     };
//!     action::create_action(db.pool(), &action).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod comment;
pub mod error;
pub mod geo;
pub mod models;
pub mod moderation;
pub mod notification;
pub mod reminder;
pub mod report;
pub mod resource;
pub mod search;
pub mod story;
pub mod user;
pub mod validation;

pub use error::{DatabaseError, Result};
pub use models::{
    Action, Comment, ModerationStatus, NewAction, NewResource, Notification, Reminder, Report,
    ReportStatus, Resource, Role, Story, TargetType, User,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    pub const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// let db = database::Database::connect("sqlite:data/connect_for_peace.db?mode=rwc").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    ///
    /// Every connection to `sqlite::memory:` opens its own empty database, so
    /// in-memory databases need a pool size of 1.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Fresh in-memory database with the schema applied.
#[cfg(test)]
pub(crate) async fn test_db() -> Database {
    let db = Database::connect_with_pool_size("sqlite::memory:", 1)
        .await
        .unwrap();
    db.migrate().await.unwrap();
    db
}
