//! Test data generation pipeline
//!
//! Turns user-supplied generator and solution sources into stored test data:
//!
//! 1. **Toolchain** (`toolchain.rs`): one-time discovery of the host's C++
//!    compiler and Python interpreter, plus extension-based language lookup.
//! 2. **Build step** (`compiler.rs`): compiles C++ sources next to the source
//!    file, serialised per source path.
//! 3. **Case generator** (`generator.rs`): runs a generator once per test index
//!    and stores its standard output as test input.
//! 4. **Output producer** (`producer.rs`): pipes every stored input through a
//!    solution and stores its standard output as expected output.
//!
//! Systemic failures (missing file, compile error, no interpreter for a
//! generator) abort a batch. Failures of a single run are logged, reported in
//! the outcome and skipped.

pub mod compiler;
pub mod generator;
pub mod process;
pub mod producer;
pub mod store;
pub mod toolchain;

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::config::ExecutionConfig;
use crate::models::TestCase;

pub use compiler::{BuildLocks, Program};
pub use store::{PgTestStore, TestStore};
pub use toolchain::{Language, Toolchain};

/// Shared handles needed to run a batch
#[derive(Clone)]
pub struct TestPipeline {
    toolchain: Arc<Toolchain>,
    build_locks: Arc<BuildLocks>,
    limits: ExecutionConfig,
}

impl TestPipeline {
    /// Create a pipeline over a discovered toolchain
    pub fn new(toolchain: Arc<Toolchain>, build_locks: Arc<BuildLocks>, limits: ExecutionConfig) -> Self {
        Self {
            toolchain,
            build_locks,
            limits,
        }
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    pub fn limits(&self) -> &ExecutionConfig {
        &self.limits
    }
}

/// A unit of a batch that was skipped
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedRun {
    /// Test index for generation runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_index: Option<i32>,
    /// Test case for solution runs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case_id: Option<Uuid>,
    pub error: String,
}

/// Result of a generation batch
#[derive(Debug)]
pub struct GenerationOutcome {
    /// Group the cases were written to; `None` when nothing was requested
    pub test_group_id: Option<Uuid>,
    pub test_cases: Vec<TestCase>,
    pub skipped: Vec<SkippedRun>,
}

/// Result of an output production batch
#[derive(Debug)]
pub struct ProductionOutcome {
    pub test_cases: Vec<TestCase>,
    pub skipped: Vec<SkippedRun>,
}
