//! Field validators for petition and donation submissions.

use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").expect("valid zip regex"));

/// Permissive email check: non-blank local part, `@`, and a dotted domain.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// US ZIP or ZIP+4, ASCII digits only. Non-US postal codes are rejected.
pub fn is_valid_zip(zip: &str) -> bool {
    ZIP_RE.is_match(zip)
}
