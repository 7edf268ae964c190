//! Field Resolver
//!
//! Generic lookup engine over untyped upstream documents. The itinerary webhook
//! renames and re-nests fields between releases, so every canonical field is
//! described by a [`Chain`] of dotted paths tried in order. A [`FieldRule`]
//! pairs a chain with a typed default.
//!
//! ## Resolution rules
//! - Paths are dotted (`travel_details.travel_dates.start_date`). The empty
//!   path [`SELF`] resolves to the record itself.
//! - `null` counts as absent.
//! - The first value that coerces to the target type wins. A value of the
//!   wrong type is skipped and the chain moves on.
//! - When nothing resolves, the rule's default applies.

use log::debug;
use serde_json::{Map, Value};

/// Path that resolves to the record itself, e.g. an activity carrying bare `lat`/`lng`.
pub const SELF: &str = "";

/// Look up a dotted path. `null` values are treated as absent.
pub fn lookup<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(doc);
    }

    path.split('.')
        .try_fold(doc, |current, key| current.get(key))
        .filter(|value| !value.is_null())
}

/// Lenient conversion from an upstream JSON value.
///
/// Returns `None` when the value cannot represent `Self`; the resolver then
/// tries the next path in the chain.
pub trait FromJson: Sized {
    fn from_json(value: &Value) -> Option<Self>;
}

impl FromJson for String {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

impl FromJson for f64 {
    fn from_json(value: &Value) -> Option<Self> {
        let number = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        number.filter(|n| n.is_finite())
    }
}

impl FromJson for u32 {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => match n.as_u64() {
                Some(i) => u32::try_from(i).ok(),
                None => n
                    .as_f64()
                    .filter(|f| f.is_finite() && *f >= 0.0 && *f <= u32::MAX as f64)
                    .map(|f| f.round() as u32),
            },
            Value::String(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
    }
}

impl FromJson for bool {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

/// An ordered list of candidate paths for one logical field.
#[derive(Debug, Clone, Copy)]
pub struct Chain {
    /// Canonical field name, used in diagnostics only.
    pub field: &'static str,
    pub paths: &'static [&'static str],
}

impl Chain {
    /// First present value, regardless of type.
    pub fn value<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.paths.iter().find_map(|path| lookup(doc, path))
    }

    /// First value accepted by `convert`.
    pub fn find_map<T>(&self, doc: &Value, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        self.paths.iter().find_map(|path| {
            let value = lookup(doc, path)?;
            let converted = convert(value);
            if converted.is_none() && !path.is_empty() {
                debug!(
                    "Ignoring malformed value for {} at '{}': {}",
                    self.field, path, value
                );
            }
            converted
        })
    }

    /// First value that coerces to `T`.
    pub fn first<T: FromJson>(&self, doc: &Value) -> Option<T> {
        self.find_map(doc, T::from_json)
    }

    /// First path holding an array. An empty array still wins.
    pub fn array<'a>(&self, doc: &'a Value) -> Option<&'a [Value]> {
        self.paths
            .iter()
            .find_map(|path| lookup(doc, path).and_then(Value::as_array))
            .map(Vec::as_slice)
    }

    /// First path holding an object.
    pub fn object<'a>(&self, doc: &'a Value) -> Option<&'a Map<String, Value>> {
        self.paths
            .iter()
            .find_map(|path| lookup(doc, path).and_then(Value::as_object))
    }
}

/// A chain with a typed default, applied when no path resolves.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule<T: 'static> {
    pub chain: Chain,
    pub default: fn() -> T,
}

impl<T: FromJson> FieldRule<T> {
    pub fn resolve(&self, doc: &Value) -> T {
        self.chain.first(doc).unwrap_or_else(self.default)
    }
}

/// Collect a list of display strings from an array or a single bare string.
///
/// Blank entries are dropped. Objects contribute their `message`, `description`
/// or `name` field when present.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    const TEXT_KEYS: Chain = Chain {
        field: "text",
        paths: &[SELF, "message", "description", "name", "text"],
    };

    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| TEXT_KEYS.first::<String>(item))
            .collect(),
        Some(single) => String::from_json(single).into_iter().collect(),
        None => Vec::new(),
    }
}
