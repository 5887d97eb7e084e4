//! Flat key/value property bags.
//!
//! A [`Properties`] value is the normalised form the transport layer reads
//! its settings from (`mail.smtp.host`, `mail.user`, ...). Loosely typed
//! option objects are converted with [`to_properties`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Normalised string-to-string property bag.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, String>);

impl Properties {
    /// Creates an empty property bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets a property, normalising key and value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidProperties`] if the key is blank.
    pub fn set(&mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Result<()> {
        let key = key.as_ref().trim();
        if key.is_empty() {
            return Err(Error::InvalidProperties("property key cannot be empty".into()));
        }
        self.0.insert(key.to_string(), value.as_ref().trim().to_string());
        Ok(())
    }

    /// Removes a property, returning its value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Overlays `other` on top of `self`; keys in `other` win.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Iterates properties in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Converts back into a JSON object of strings.
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect::<Map<String, Value>>(),
        )
    }
}

// Hand-written so that secrets never end up in logs.
impl std::fmt::Debug for Properties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.0.iter().map(|(k, v)| {
                let shown = if is_secret(k) { "***" } else { v.as_str() };
                (k, shown)
            }))
            .finish()
    }
}

fn is_secret(key: &str) -> bool {
    key.ends_with("password") || key.ends_with("secret")
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Properties {
    /// Collects pairs, silently skipping blank keys.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            let _ = props.set(k, v);
        }
        props
    }
}

/// Converts an options object into a normalised property bag.
///
/// Keys and string values are trimmed, booleans and numbers are rendered
/// as strings and `null` entries are dropped. Applying this to the
/// [`Properties::to_value`] of its own output returns the same bag.
///
/// # Errors
///
/// Returns [`Error::InvalidProperties`] if `options` is not an object, a key
/// is blank, two keys are equal once trimmed, or a value is an array or
/// nested object.
pub fn to_properties(options: &Value) -> Result<Properties> {
    let Value::Object(map) = options else {
        return Err(Error::InvalidProperties(format!(
            "expected an object, got {}",
            kind_of(options)
        )));
    };

    let mut props = Properties::new();
    for (key, value) in map {
        let rendered = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            Value::Bool(b) => b.to_string(),
            Value::Number(n) => n.to_string(),
            Value::Array(_) | Value::Object(_) => {
                return Err(Error::InvalidProperties(format!(
                    "value of '{key}' must be a scalar, got {}",
                    kind_of(value)
                )));
            }
        };
        if props.get(key.trim()).is_some() {
            return Err(Error::InvalidProperties(format!(
                "duplicate property '{}'",
                key.trim()
            )));
        }
        props.set(key, rendered)?;
    }

    Ok(props)
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
