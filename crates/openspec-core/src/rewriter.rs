// ABOUTME: Suggestion-triggered textual rewriting of a code string
// ABOUTME: Wraps, guards and substitutes text in a fixed order; no AST awareness

use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{fired, Suggestion, SuggestionCategory};

static UNSAFE_SELECT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SELECT \* FROM (\w+) WHERE (\w+) = '([^']+)'").unwrap());

const PARAMETRIZED_SELECT: &str = "SELECT * FROM $1 WHERE $2 = $3";

const INPUT_GUARD: &str = "// Input validation
if (!input || typeof input !== 'object') {
  throw new Error('Invalid input');
}
";

/// Rewrite `code`, stamping the header with the current time.
pub fn rewrite(code: &str, suggestions: &[Suggestion]) -> String {
    rewrite_at(code, suggestions, Utc::now())
}

/// Same as [`rewrite`] with an explicit header timestamp.
pub fn rewrite_at(code: &str, suggestions: &[Suggestion], timestamp: DateTime<Utc>) -> String {
    let mut rewritten = code.to_string();

    if fired(suggestions, SuggestionCategory::ErrorHandling) {
        rewritten = wrap_in_try_catch(&rewritten);
    }

    if fired(suggestions, SuggestionCategory::InputValidation) {
        rewritten = format!("{}\n{}", INPUT_GUARD, rewritten);
    }

    if fired(suggestions, SuggestionCategory::SqlInjection) {
        rewritten = parametrize_select(&rewritten);
    }

    format!("{}\n{}", header(timestamp), rewritten)
}

/// Only the first line of `code` is indented; later lines keep their own.
fn wrap_in_try_catch(code: &str) -> String {
    format!(
        "try {{\n  {}\n}} catch (error) {{\n  console.error('Error:', error.message);\n  throw new Error('Operation failed');\n}}",
        code
    )
}

pub fn parametrize_select(code: &str) -> String {
    UNSAFE_SELECT_RE
        .replace_all(code, PARAMETRIZED_SELECT)
        .into_owned()
}

fn header(timestamp: DateTime<Utc>) -> String {
    format!(
        "/**\n * Optimized function\n * Generated by OpenSpec Forge\n * Timestamp: {}\n */",
        timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}
