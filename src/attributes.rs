//! Telemetry attribute line parsing.
//!
//! Drone telemetry logs carry one attribute line per video frame, made of
//! `key: value` tokens that are usually wrapped in square brackets:
//!
//! ```text
//! [iso: 110] [shutter: 1/200.0] [focal_len: 24.00] [latitude: 22.608019] [longitude: 114.023509] [rel_alt: 1.300 abs_alt: 18.027]
//! ```
//!
//! [`parse_attributes`] turns such a line into an [`Attributes`] map. It does
//! not check for required keys or validate values; that is left to the
//! [`telemetry`](crate::telemetry) reader.

use std::{collections::HashMap, sync::LazyLock};

use regex::Regex;

/// `key: value` where the key is a run of word characters and the value runs
/// until whitespace or a bracket.
static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s*:\s+([^\s\[\]]+)").expect("attribute pattern is valid")
});

/// Raw key/value pairs parsed from one attribute line.
///
/// Keys are case-sensitive and kept exactly as they appear in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    values: HashMap<String, String>,
}

impl Attributes {
    /// Look up the raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// `true` if the line carried no `key: value` tokens.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all key/value pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

/// Parse every `key: value` token on `line`.
///
/// When a key appears more than once, the last occurrence wins.
///
/// # Example
///
/// ```
/// use geoframe::parse_attributes;
///
/// let attributes = parse_attributes("[latitude: 22.6] [longitude: 114.0] [rel_alt: 1.3 abs_alt: 18.0]");
/// assert_eq!(attributes.get("latitude"), Some("22.6"));
/// assert_eq!(attributes.get("abs_alt"), Some("18.0"));
/// assert_eq!(attributes.get("focal_len"), None);
/// ```
pub fn parse_attributes(line: &str) -> Attributes {
    let values = ATTRIBUTE_PATTERN
        .captures_iter(line)
        .map(|captures| (captures[1].to_string(), captures[2].to_string()))
        .collect();
    Attributes { values }
}
