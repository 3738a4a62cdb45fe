//! Null-safe access to decoded API documents.
//!
//! Every accessor takes a dotted path (`"primaryPosition.code"`) and returns
//! `None` when any segment is missing, null, or of the wrong shape. Nothing
//! here fails.

use serde_json::Value as Json;

/// Read-only view over one JSON object or array element.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    value: &'a Json,
}

impl<'a> Record<'a> {
    pub const fn new(value: &'a Json) -> Self {
        Self { value }
    }

    /// Raw value at `path`, `None` for missing or JSON null.
    pub fn value(&self, path: &str) -> Option<&'a Json> {
        let mut current = self.value;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        (!current.is_null()).then_some(current)
    }

    pub fn int(&self, path: &str) -> Option<i64> {
        self.value(path).and_then(coerce_int)
    }

    pub fn float(&self, path: &str) -> Option<f64> {
        self.value(path).and_then(coerce_float)
    }

    /// String value; numbers and booleans are rendered to text.
    pub fn text(&self, path: &str) -> Option<String> {
        match self.value(path)? {
            Json::String(text) => Some(text.clone()),
            Json::Number(number) => Some(number.to_string()),
            Json::Bool(flag) => Some(flag.to_string()),
            _ => None,
        }
    }

    pub fn bool(&self, path: &str) -> Option<bool> {
        self.value(path).and_then(Json::as_bool)
    }

    /// Nested object at `path`.
    pub fn record(&self, path: &str) -> Option<Record<'a>> {
        self.value(path)
            .filter(|value| value.is_object())
            .map(Record::new)
    }

    /// Elements of the array at `path`; empty when absent.
    pub fn list(&self, path: &str) -> Vec<Record<'a>> {
        self.value(path)
            .and_then(Json::as_array)
            .map(|items| items.iter().map(Record::new).collect())
            .unwrap_or_default()
    }

    /// Length of the array at `path`, `None` when absent.
    pub fn count(&self, path: &str) -> Option<usize> {
        self.value(path).and_then(Json::as_array).map(Vec::len)
    }
}

/// Integer conversion: JSON integers pass, finite floats truncate toward
/// zero, strings must parse as integers.
pub fn coerce_int(value: &Json) -> Option<i64> {
    match value {
        Json::Number(number) => number
            .as_i64()
            .or_else(|| number.as_f64().and_then(truncate_float)),
        Json::String(text) => parse_int(text),
        _ => None,
    }
}

/// Float conversion: any JSON number, or a string parsing as a finite float.
pub fn coerce_float(value: &Json) -> Option<f64> {
    match value {
        Json::Number(number) => number.as_f64().filter(|v| v.is_finite()),
        Json::String(text) => parse_float(text),
        _ => None,
    }
}

pub fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

pub fn parse_float(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

pub(crate) fn truncate_float(value: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_807.0;
    (value.is_finite() && value.abs() < LIMIT).then(|| value.trunc() as i64)
}
