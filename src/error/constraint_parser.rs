use std::sync::OnceLock;

use regex::Regex;

/// Extracts the table and column behind a unique constraint violation.
///
/// PostgreSQL reports the constraint name (`users_email_key`) plus a
/// `Key (email)=(...)` detail line; SQLite reports
/// `UNIQUE constraint failed: users.email` with no constraint name.
pub struct ConstraintParser;

struct RegexPatterns {
    pg_key: Regex,
    pg_table: Regex,
    sqlite_unique: Regex,
}

impl RegexPatterns {
    fn new() -> Self {
        Self {
            pg_key: Regex::new(r"Key \(([^)]+)\)=").expect("valid pg key pattern"),
            pg_table: Regex::new(r#"table "([^"]+)""#).expect("valid pg table pattern"),
            sqlite_unique: Regex::new(r"UNIQUE constraint failed: (\w+)\.(\w+)")
                .expect("valid sqlite unique pattern"),
        }
    }
}

static REGEX_PATTERNS: OnceLock<RegexPatterns> = OnceLock::new();

impl ConstraintParser {
    fn patterns() -> &'static RegexPatterns {
        REGEX_PATTERNS.get_or_init(RegexPatterns::new)
    }

    /// Returns `(entity, field)` for a unique violation, if it can be identified.
    pub fn parse_unique_violation(
        message: &str,
        constraint_name: Option<&str>,
    ) -> Option<(String, String)> {
        if let Some(parsed) = constraint_name.and_then(Self::parse_constraint_name) {
            return Some(parsed);
        }

        let patterns = Self::patterns();

        if let Some(caps) = patterns.sqlite_unique.captures(message) {
            return Some((caps[1].to_string(), caps[2].to_string()));
        }

        if let Some(caps) = patterns.pg_key.captures(message) {
            let entity = patterns
                .pg_table
                .captures(message)
                .map(|t| t[1].to_string())
                .unwrap_or_else(|| "resource".to_string());
            return Some((entity, caps[1].to_string()));
        }

        None
    }

    /// Splits `users_email_key` style names into `("users", "email")`.
    fn parse_constraint_name(constraint: &str) -> Option<(String, String)> {
        let stem = ["_key", "_unique", "_idx"]
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))?;
        let (entity, field) = stem.split_once('_')?;
        if entity.is_empty() || field.is_empty() {
            return None;
        }
        Some((entity.to_string(), field.to_string()))
    }
}
