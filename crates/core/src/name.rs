//! Channel and agent name validation.
//!
//! Names are exact-match map keys throughout the store, so the charset is
//! restricted up front: lowercase letters, digits, and underscores only.
//! This heads off case-sensitivity confusion (`Project-Alpha` vs
//! `project_alpha`) before a name ever becomes a key.

use crate::error::{Error, Result};
use regex_lite::Regex;
use std::sync::LazyLock;

static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("^[a-z0-9_]+$").expect("static pattern compiles"));

/// Validate a channel or agent name.
///
/// `kind` names the field in the error message ("channel name", "agent name").
pub fn validate_name(name: &str, kind: &str) -> Result<()> {
    if NAME_PATTERN.is_match(name) {
        Ok(())
    } else {
        Err(Error::validation(format!(
            "Invalid {kind}: only lowercase letters, numbers, and underscores allowed"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_lowercase_alnum_underscore() {
        for name in ["my_project", "worker_1", "backend_team", "test123", "_"] {
            assert!(validate_name(name, "channel name").is_ok(), "{name}");
        }
    }

    #[test]
    fn rejects_uppercase_and_punctuation() {
        for name in ["My-Project", "worker.1", "team@alpha", "Proj", "a b"] {
            assert!(validate_name(name, "channel name").is_err(), "{name}");
        }
    }

    #[test]
    fn rejects_empty_name() {
        let err = validate_name("", "agent name").unwrap_err();
        assert!(err.to_string().contains("agent name"));
    }
}
