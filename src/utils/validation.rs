//! Input validation utilities

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{languages, ALLOWED_UPLOAD_EXTENSIONS};

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid regex"));

static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*$").expect("valid regex"));

/// Validate username characters (length is checked by the request DTO)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if USERNAME.is_match(username) {
        Ok(())
    } else {
        Err("Username must start with a letter and contain only letters, numbers, underscores, and hyphens")
    }
}

/// Reduce an uploaded file name to a safe base name.
///
/// Directory components are dropped and runs of unusual characters become a
/// single underscore. Returns `None` when nothing usable is left.
pub fn sanitize_file_name(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_FILE_CHARS.replace_all(base.trim(), "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '.') {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Lowercased extension of `name` if it is on the upload whitelist
pub fn allowed_extension(name: &str) -> Option<String> {
    let extension = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())?
        .to_ascii_lowercase();

    ALLOWED_UPLOAD_EXTENSIONS
        .contains(&extension.as_str())
        .then_some(extension)
}

/// Language tag implied by a whitelisted extension
pub fn infer_language(extension: &str) -> &'static str {
    match extension {
        "cpp" => languages::CPP,
        "c" => languages::C,
        "py" => languages::PYTHON,
        "java" => languages::JAVA,
        _ => languages::TEXT,
    }
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("Alice_123").is_ok());
        assert!(validate_username("123abc").is_err());
        assert!(validate_username("user@name").is_err());
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("gen.cpp").as_deref(), Some("gen.cpp"));
        assert_eq!(sanitize_file_name("../../etc/passwd").as_deref(), Some("passwd"));
        assert_eq!(sanitize_file_name("C:\\work\\my sol (2).py").as_deref(), Some("my_sol_2_.py"));
        assert_eq!(sanitize_file_name(".hidden.py").as_deref(), Some("hidden.py"));
        assert_eq!(sanitize_file_name("   "), None);
        assert_eq!(sanitize_file_name("../"), None);
    }

    #[test]
    fn test_allowed_extension() {
        assert_eq!(allowed_extension("sol.CPP").as_deref(), Some("cpp"));
        assert_eq!(allowed_extension("01.in").as_deref(), Some("in"));
        assert_eq!(allowed_extension("run.sh"), None);
        assert_eq!(allowed_extension("Makefile"), None);
    }

    #[test]
    fn test_infer_language() {
        assert_eq!(infer_language("cpp"), "cpp");
        assert_eq!(infer_language("py"), "python");
        assert_eq!(infer_language("out"), "text");
    }

    #[test]
    fn test_sanitize_string() {
        assert_eq!(sanitize_string("  A\u{7} + B \n"), "A + B");
    }
}
