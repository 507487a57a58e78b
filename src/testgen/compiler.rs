//! Build step: turn a source file into something runnable
//!
//! C++ sources are compiled to `<source stem>.exe` next to the source.
//! Interpreted sources are used as they are. Compilation of a given source
//! path is serialised: the prepared [`Program`] holds the per-path lock until
//! it is dropped, so a batch that compiled a binary also finishes running it
//! before another request may rebuild it.

use std::collections::HashMap;
use std::ffi::OsString;
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    constants::EXECUTABLE_EXTENSION,
    error::{AppError, AppResult},
};

use super::process::{self, Invocation, ProcessOutput};
use super::toolchain::{Language, Toolchain};

/// Async mutexes created on demand, one per key
#[derive(Debug)]
struct LockMap<K> {
    locks: Mutex<HashMap<K, Arc<AsyncMutex<()>>>>,
}

impl<K> Default for LockMap<K> {
    fn default() -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Eq + Hash> LockMap<K> {
    async fn acquire(&self, key: K) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|e| e.into_inner());
            // Forget locks nobody holds or waits on so the map stays small
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(key)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }
}

/// Locks shared by every batch in this process.
///
/// Source locks guard compiled artifacts. Group locks keep two batches from
/// numbering tests in the same group at once. A batch always takes its
/// source lock before its group lock.
#[derive(Debug, Default)]
pub struct BuildLocks {
    sources: LockMap<PathBuf>,
    groups: LockMap<Uuid>,
}

impl BuildLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive use of `source`
    pub async fn acquire(&self, source: &Path) -> OwnedMutexGuard<()> {
        self.sources.acquire(source.to_path_buf()).await
    }

    /// Wait for exclusive right to append tests to `group_id`
    pub async fn acquire_group(&self, group_id: Uuid) -> OwnedMutexGuard<()> {
        self.groups.acquire(group_id).await
    }
}

/// Target path of a compiled source
pub fn executable_path(source: &Path) -> PathBuf {
    source.with_extension(EXECUTABLE_EXTENSION)
}

/// Compile a C++ source, returning the executable path.
///
/// A non-zero compiler exit becomes `CompilationError` carrying the
/// compiler's diagnostics.
pub async fn compile(
    toolchain: &Toolchain,
    source: &Path,
    limit: Duration,
) -> AppResult<PathBuf> {
    let compiler = toolchain.compiler()?;
    let executable = executable_path(source);

    let mut invocation = Invocation::new(&compiler.path)
        .arg(source)
        .arg("-o")
        .arg(&executable)
        .arg(format!("-std={}", toolchain.cxx_std));
    if let Some(dir) = source.parent().filter(|d| !d.as_os_str().is_empty()) {
        invocation = invocation.current_dir(dir);
    }

    tracing::debug!(source = %source.display(), "Compiling");

    let output = match process::run(&invocation, None, limit).await {
        Ok(output) => output,
        Err(AppError::Timeout(ms)) => {
            return Err(AppError::CompilationError(format!(
                "Compilation timed out after {} ms",
                ms
            )));
        }
        Err(e) => return Err(e),
    };

    if !output.success() {
        return Err(AppError::CompilationError(diagnostics(&output)));
    }

    tracing::info!(
        source = %source.display(),
        executable = %executable.display(),
        duration_ms = output.elapsed.as_millis() as u64,
        "Compiled"
    );

    Ok(executable)
}

fn diagnostics(output: &ProcessOutput) -> String {
    let mut text = output.stderr.trim().to_string();
    if text.is_empty() {
        text = output.stdout.trim().to_string();
    }
    if text.is_empty() {
        text = output.failure_summary();
    }
    text
}

/// A source that is ready to run
#[derive(Debug)]
pub struct Program {
    pub language: Language,
    pub source: PathBuf,
    /// Compiled binary, or the source itself for interpreted languages
    pub executable: PathBuf,
    _guard: OwnedMutexGuard<()>,
}

impl Program {
    /// Resolve the language of `source` and build it if needed.
    ///
    /// Holds the build lock for `source` for as long as the program lives.
    pub async fn prepare(
        toolchain: &Toolchain,
        locks: &BuildLocks,
        source: &Path,
        compile_timeout: Duration,
    ) -> AppResult<Self> {
        let language = Language::from_path(source)?;
        let guard = locks.acquire(source).await;

        let executable = if language.needs_compilation() {
            compile(toolchain, source, compile_timeout).await?
        } else {
            source.to_path_buf()
        };

        Ok(Self {
            language,
            source: source.to_path_buf(),
            executable,
            _guard: guard,
        })
    }

    /// Command line running this program with `args`
    pub fn invocation(&self, toolchain: &Toolchain, args: Vec<OsString>) -> AppResult<Invocation> {
        toolchain.run_invocation(self.language, &self.executable, args)
    }
}
