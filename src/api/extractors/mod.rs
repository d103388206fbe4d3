//! Request extractors and shared validation rules.

mod validated_json;

use once_cell::sync::Lazy;
use regex::Regex;

pub use validated_json::ValidatedJson;

/// Digits with an optional leading `+`, 9 to 15 long
pub static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9]{9,15}$").expect("Invalid Regex"));
