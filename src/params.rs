//! Request Parameters Module
//!
//! Canonical parameter maps shared by the wire layer and the cache.
//! The encoded form doubles as cache key and prefix-match target, so it
//! must be deterministic: entries are kept sorted by byte-ordinal key
//! order and rendered as a standard urlencoded query string.

use std::collections::BTreeMap;

use url::form_urlencoded;

// == Param Value ==
/// A scalar request parameter value.
///
/// `Null` is a first-class value: it renders as the empty string, exactly
/// like an absent backend argument. That coercion means `{"a": Null}` and
/// `{"a": ""}` share a cache key; the collision is accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Int(i64),
    Float(f64),
    Null,
}

impl ParamValue {
    /// Renders the value the way the backend expects it on the wire.
    pub fn render(&self) -> String {
        match self {
            ParamValue::Text(s) => s.clone(),
            ParamValue::Int(n) => n.to_string(),
            ParamValue::Float(f) => f.to_string(),
            ParamValue::Null => String::new(),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        ParamValue::Int(i64::from(value))
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => v.into(),
            None => ParamValue::Null,
        }
    }
}

// == Params ==
/// An order-independent mapping from parameter name to scalar value.
///
/// Backed by a `BTreeMap`, so iteration order is always lexicographic by
/// key bytes regardless of insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    entries: BTreeMap<String, ParamValue>,
}

impl Params {
    // == Constructor ==
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    // == Set ==
    /// Inserts a parameter, replacing any previous value for the key.
    pub fn set(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.entries.insert(key.to_string(), value.into());
        self
    }

    // == Set Optional ==
    /// Inserts a parameter only when a value is present.
    ///
    /// Absent filters stay out of the encoded key entirely, keeping the
    /// common key families stable for prefix invalidation.
    pub fn set_opt(self, key: &str, value: Option<impl Into<ParamValue>>) -> Self {
        match value {
            Some(v) => self.set(key, v),
            None => self,
        }
    }

    // == Encode ==
    /// Serializes the map as a canonical `key=value&key=value` string.
    ///
    /// Keys come out sorted by ordinal byte order, values are rendered via
    /// [`ParamValue::render`] and urlencoded (space as `+`). Two maps with
    /// the same key/value sets always encode identically.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.entries {
            serializer.append_pair(key, &value.render());
        }
        serializer.finish()
    }

    /// Iterates the entries in encoding order with rendered values.
    pub fn iter_rendered(&self) -> impl Iterator<Item = (&str, String)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.render()))
    }

    /// Collects the entries as owned pairs, for form bodies.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.iter_rendered()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }

    // == Length ==
    /// Returns the number of parameters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
