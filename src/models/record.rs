// ABOUTME: TabularRecord - one row returned by the prediction service
// Field order is the order the service sent, which defines export column order

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabularRecord(Map<String, Value>);

impl TabularRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used when assembling records locally (tests, fixtures)
    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Field names in received order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Numeric value of a field. Numeric strings count; anything else is None.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        match self.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }

    /// String form of a field, None for null or absent
    pub fn text(&self, field: &str) -> Option<String> {
        self.get(field).and_then(scalar_to_string)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for TabularRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Render a JSON value the way a spreadsheet user expects to read it.
/// Null has no string form.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(match n.as_f64() {
            Some(f) if !(n.is_i64() || n.is_u64()) => format_float(f),
            _ => n.to_string(),
        }),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => Some(value.to_string()),
    }
}

// Integral floats print without a fractional part (1.0 -> "1"); very small
// and very large magnitudes switch to exponent form (1.5e-7, 1e+21)
fn format_float(f: f64) -> String {
    if f == 0.0 {
        "0".to_string()
    } else if f.abs() < 1e-6 || f.abs() >= 1e21 {
        let exp = format!("{:e}", f);
        match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => {
                format!("{}e+{}", mantissa, power)
            }
            _ => exp,
        }
    } else if f.fract() == 0.0 {
        format!("{:.0}", f)
    } else {
        f.to_string()
    }
}
