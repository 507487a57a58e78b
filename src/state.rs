//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::testgen::{BuildLocks, TestPipeline, Toolchain};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Database connection pool
    db: PgPool,

    /// Application configuration
    config: Config,

    /// Tools discovered at startup
    toolchain: Arc<Toolchain>,

    /// Per-source compile locks shared by every request
    build_locks: Arc<BuildLocks>,
}

impl AppState {
    /// Create a new application state
    pub fn new(db: PgPool, config: Config, toolchain: Toolchain, build_locks: BuildLocks) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                db,
                config,
                toolchain: Arc::new(toolchain),
                build_locks: Arc::new(build_locks),
            }),
        }
    }

    /// Get a reference to the database pool
    pub fn db(&self) -> &PgPool {
        &self.inner.db
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.inner.toolchain
    }

    /// Test pipeline bound to this state's toolchain and limits
    pub fn pipeline(&self) -> TestPipeline {
        TestPipeline::new(
            self.inner.toolchain.clone(),
            self.inner.build_locks.clone(),
            self.inner.config.execution.clone(),
        )
    }
}
