//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 3001;

/// API base path
pub const API_BASE_PATH: &str = "/api";

// =============================================================================
// DATABASE DEFAULTS
// =============================================================================

/// Default maximum database connections in the pool
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 20;

// =============================================================================
// AUTHENTICATION DEFAULTS
// =============================================================================

/// Default JWT token expiry in hours (7 days)
pub const DEFAULT_JWT_EXPIRY_HOURS: i64 = 168;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: u64 = 6;

/// Maximum password length
pub const MAX_PASSWORD_LENGTH: u64 = 128;

/// Username minimum length
pub const MIN_USERNAME_LENGTH: u64 = 3;

/// Username maximum length
pub const MAX_USERNAME_LENGTH: u64 = 50;

// =============================================================================
// STORAGE DEFAULTS
// =============================================================================

/// Default directory for uploaded problem files
pub const DEFAULT_UPLOADS_PATH: &str = "./uploads/problems";

/// Default maximum size of an uploaded problem file (10 MB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Extensions accepted by the file upload endpoint
pub const ALLOWED_UPLOAD_EXTENSIONS: &[&str] = &["cpp", "c", "py", "java", "txt", "in", "out"];

// =============================================================================
// EXECUTION DEFAULTS
// =============================================================================

/// Default compiler timeout in milliseconds
pub const DEFAULT_COMPILE_TIMEOUT_MS: u64 = 30_000;

/// Default timeout for a single generator run in milliseconds
pub const DEFAULT_GENERATOR_TIMEOUT_MS: u64 = 10_000;

/// Default timeout for a single solution run in milliseconds
pub const DEFAULT_SOLUTION_TIMEOUT_MS: u64 = 10_000;

/// Default cap on tests generated by one request
pub const DEFAULT_MAX_TESTS_PER_REQUEST: i32 = 100;

/// Maximum number of stderr characters kept in an execution error
pub const MAX_DIAGNOSTIC_CHARS: usize = 500;

/// Suffix of compiled executables, replacing the source extension
pub const EXECUTABLE_EXTENSION: &str = "exe";

// =============================================================================
// TOOLCHAIN DEFAULTS
// =============================================================================

/// C++ compilers probed at startup, in order of preference
pub const DEFAULT_CXX_CANDIDATES: &str = "g++";

/// Python interpreters probed at startup, in order of preference
pub const DEFAULT_PYTHON_CANDIDATES: &str = "python3,python";

/// Language standard passed to the C++ compiler
pub const DEFAULT_CXX_STD: &str = "c++17";

// =============================================================================
// PROBLEM DEFAULTS
// =============================================================================

/// Default time limit in milliseconds
pub const DEFAULT_TIME_LIMIT_MS: i32 = 1000;

/// Default memory limit in megabytes
pub const DEFAULT_MEMORY_LIMIT_MB: i32 = 256;

/// Time limit bounds in milliseconds
pub const MIN_TIME_LIMIT_MS: i32 = 100;
pub const MAX_TIME_LIMIT_MS: i32 = 10_000;

/// Memory limit bounds in megabytes
pub const MIN_MEMORY_LIMIT_MB: i32 = 64;
pub const MAX_MEMORY_LIMIT_MB: i32 = 1024;

/// Maximum problem name/title length
pub const MAX_PROBLEM_NAME_LENGTH: u64 = 255;

// =============================================================================
// TEST GENERATION
// =============================================================================

/// Number of tests generated when the request does not say
pub const DEFAULT_TEST_COUNT: i32 = 5;

/// Group used when the request does not name one
pub const DEFAULT_GROUP_NAME: &str = "main";

/// Points assigned to a lazily created test group
pub const DEFAULT_GROUP_POINTS: i32 = 100;

/// Times one generated test is retried at a fresh index after another
/// writer took the index first
pub const MAX_TEST_INDEX_ATTEMPTS: u32 = 3;

/// Maximum test group name length
pub const MAX_GROUP_NAME_LENGTH: u64 = 255;

/// Problem file roles
pub mod file_types {
    pub const GENERATOR: &str = "generator";
    pub const CHECKER: &str = "checker";
    pub const INTERACTOR: &str = "interactor";
    pub const SOLUTION: &str = "solution";

    /// All problem file roles
    pub const ALL: &[&str] = &[GENERATOR, CHECKER, INTERACTOR, SOLUTION];
}

/// Language tags stored on problem files
pub mod languages {
    pub const CPP: &str = "cpp";
    pub const C: &str = "c";
    pub const PYTHON: &str = "python";
    pub const JAVA: &str = "java";
    pub const TEXT: &str = "text";
}
