//! Toolchain discovery and language resolution

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::{
    config::ToolchainConfig,
    constants::languages,
    error::{AppError, AppResult},
};

use super::process::{self, Invocation};

/// Source languages the pipeline can build and run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Cpp,
    Python,
}

impl Language {
    /// Resolve the language from a source file's extension
    pub fn from_path(path: &Path) -> AppResult<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "cpp" => Ok(Self::Cpp),
            "py" => Ok(Self::Python),
            "" => Err(AppError::UnsupportedLanguage(format!(
                "{} has no file extension",
                display_name(path)
            ))),
            other => Err(AppError::UnsupportedLanguage(format!(
                ".{} ({})",
                other,
                display_name(path)
            ))),
        }
    }

    /// Whether sources must go through the build step before running
    pub fn needs_compilation(&self) -> bool {
        matches!(self, Self::Cpp)
    }

    /// Language tag stored on problem files
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Cpp => languages::CPP,
            Self::Python => languages::PYTHON,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A probed tool
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub path: PathBuf,
    /// First line of `--version` output
    pub version: String,
}

impl ToolInfo {
    pub fn new(path: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
        }
    }
}

/// Immutable record of the tools available on this host
#[derive(Debug, Clone, Default, Serialize)]
pub struct Toolchain {
    pub cxx: Option<ToolInfo>,
    pub python: Option<ToolInfo>,
    /// Value passed as `-std=` to the C++ compiler
    pub cxx_std: String,
}

impl Toolchain {
    /// Probe every configured candidate once.
    ///
    /// A candidate is accepted when it is on `PATH` and `<bin> --version`
    /// exits successfully within `probe_timeout`.
    pub async fn discover(config: &ToolchainConfig, probe_timeout: Duration) -> Self {
        let cxx = probe_first(&config.cxx_candidates, probe_timeout).await;
        let python = probe_first(&config.python_candidates, probe_timeout).await;

        match &cxx {
            Some(tool) => tracing::info!(path = %tool.path.display(), version = %tool.version, "C++ compiler found"),
            None => tracing::warn!(candidates = ?config.cxx_candidates, "No usable C++ compiler found"),
        }
        match &python {
            Some(tool) => tracing::info!(path = %tool.path.display(), version = %tool.version, "Python interpreter found"),
            None => tracing::warn!(candidates = ?config.python_candidates, "No usable Python interpreter found"),
        }

        Self {
            cxx,
            python,
            cxx_std: config.cxx_std.clone(),
        }
    }

    /// The C++ compiler, or `ToolchainUnavailable`
    pub fn compiler(&self) -> AppResult<&ToolInfo> {
        self.cxx
            .as_ref()
            .ok_or_else(|| AppError::ToolchainUnavailable("no C++ compiler on host".to_string()))
    }

    /// The Python interpreter, or `ToolchainUnavailable`
    pub fn interpreter(&self) -> AppResult<&ToolInfo> {
        self.python.as_ref().ok_or_else(|| {
            AppError::ToolchainUnavailable("no Python interpreter on host".to_string())
        })
    }

    /// Build the command line that runs `executable` with `args`.
    ///
    /// Compiled programs run directly; Python sources run through the
    /// interpreter. The working directory is the program's own directory.
    pub fn run_invocation(
        &self,
        language: Language,
        executable: &Path,
        args: Vec<OsString>,
    ) -> AppResult<Invocation> {
        let cwd = executable.parent().map(Path::to_path_buf);

        let invocation = match language {
            Language::Cpp => Invocation::new(executable).args(args),
            Language::Python => Invocation::new(&self.interpreter()?.path)
                .arg(executable)
                .args(args),
        };

        Ok(match cwd {
            Some(dir) if !dir.as_os_str().is_empty() => invocation.current_dir(dir),
            _ => invocation,
        })
    }
}

async fn probe_first(candidates: &[String], probe_timeout: Duration) -> Option<ToolInfo> {
    for candidate in candidates {
        let Ok(path) = which::which(candidate) else {
            tracing::debug!(candidate = %candidate, "Not found on PATH");
            continue;
        };

        let invocation = Invocation::new(&path).arg("--version");
        match process::run(&invocation, None, probe_timeout).await {
            Ok(output) if output.success() => {
                // Python 2 printed its version on stderr
                let text = if output.stdout.trim().is_empty() {
                    &output.stderr
                } else {
                    &output.stdout
                };
                let version = text.lines().next().unwrap_or_default().trim().to_string();
                return Some(ToolInfo::new(path, version));
            }
            Ok(output) => {
                tracing::debug!(candidate = %candidate, exit_code = ?output.exit_code, "Version probe failed");
            }
            Err(e) => {
                tracing::debug!(candidate = %candidate, error = %e, "Version probe failed");
            }
        }
    }

    None
}
