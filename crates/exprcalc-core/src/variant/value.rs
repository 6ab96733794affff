//! Variant value types

use chrono::{DateTime, Duration, Utc};
use std::fmt;

/// A dynamically-typed value used for operands and results
///
/// The enum discriminant is the type tag, so the tag always matches the
/// payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Variant {
    /// No value
    #[default]
    Null,

    /// 32-bit integer
    Integer(i32),

    /// 64-bit integer
    Long(i64),

    /// Single precision float
    Float(f32),

    /// Double precision float
    Double(f64),

    /// Text
    String(String),

    /// TRUE/FALSE
    Boolean(bool),

    /// Point in time (UTC)
    DateTime(DateTime<Utc>),

    /// Signed time interval
    TimeSpan(Duration),

    /// Opaque structured value
    Object(serde_json::Value),

    /// Ordered list of values
    Array(Vec<Variant>),
}

/// Type tag of a [`Variant`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VariantType {
    Null,
    Integer,
    Long,
    Float,
    Double,
    String,
    Boolean,
    DateTime,
    TimeSpan,
    Object,
    Array,
}

impl VariantType {
    /// Type name as shown in error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            VariantType::Null => "Null",
            VariantType::Integer => "Integer",
            VariantType::Long => "Long",
            VariantType::Float => "Float",
            VariantType::Double => "Double",
            VariantType::String => "String",
            VariantType::Boolean => "Boolean",
            VariantType::DateTime => "DateTime",
            VariantType::TimeSpan => "TimeSpan",
            VariantType::Object => "Object",
            VariantType::Array => "Array",
        }
    }

    /// Check if this is one of the numeric lattice types
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            VariantType::Integer | VariantType::Long | VariantType::Float | VariantType::Double
        )
    }
}

impl fmt::Display for VariantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Variant {
    /// Create a new string value
    pub fn string<S: Into<String>>(s: S) -> Self {
        Variant::String(s.into())
    }

    /// Create a time span from milliseconds
    pub fn time_span_millis(ms: i64) -> Self {
        Variant::TimeSpan(millis(ms))
    }

    /// Type tag of this value
    pub fn variant_type(&self) -> VariantType {
        match self {
            Variant::Null => VariantType::Null,
            Variant::Integer(_) => VariantType::Integer,
            Variant::Long(_) => VariantType::Long,
            Variant::Float(_) => VariantType::Float,
            Variant::Double(_) => VariantType::Double,
            Variant::String(_) => VariantType::String,
            Variant::Boolean(_) => VariantType::Boolean,
            Variant::DateTime(_) => VariantType::DateTime,
            Variant::TimeSpan(_) => VariantType::TimeSpan,
            Variant::Object(_) => VariantType::Object,
            Variant::Array(_) => VariantType::Array,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, Variant::Null)
    }

    /// Check if the value is a number
    pub fn is_numeric(&self) -> bool {
        self.variant_type().is_numeric()
    }

    /// Type name for error messages
    pub fn type_name(&self) -> &'static str {
        self.variant_type().as_str()
    }
}

/// Build a duration from milliseconds, clamping the one value chrono rejects
pub(crate) fn millis(ms: i64) -> Duration {
    Duration::milliseconds(ms.max(-i64::MAX))
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}

impl From<bool> for Variant {
    fn from(b: bool) -> Self {
        Variant::Boolean(b)
    }
}

impl From<i32> for Variant {
    fn from(n: i32) -> Self {
        Variant::Integer(n)
    }
}

impl From<i64> for Variant {
    fn from(n: i64) -> Self {
        Variant::Long(n)
    }
}

impl From<f32> for Variant {
    fn from(n: f32) -> Self {
        Variant::Float(n)
    }
}

impl From<f64> for Variant {
    fn from(n: f64) -> Self {
        Variant::Double(n)
    }
}

impl From<&str> for Variant {
    fn from(s: &str) -> Self {
        Variant::String(s.to_string())
    }
}

impl From<String> for Variant {
    fn from(s: String) -> Self {
        Variant::String(s)
    }
}

impl From<DateTime<Utc>> for Variant {
    fn from(dt: DateTime<Utc>) -> Self {
        Variant::DateTime(dt)
    }
}

impl From<Duration> for Variant {
    fn from(d: Duration) -> Self {
        Variant::TimeSpan(d)
    }
}

impl From<Vec<Variant>> for Variant {
    fn from(items: Vec<Variant>) -> Self {
        Variant::Array(items)
    }
}

impl<T: Into<Variant>> From<Option<T>> for Variant {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Variant::Null)
    }
}

/// JSON scalars map onto their natural variant; objects stay opaque
impl From<serde_json::Value> for Variant {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Variant::Null,
            Value::Bool(b) => Variant::Boolean(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => Variant::Integer(small),
                        Err(_) => Variant::Long(i),
                    }
                } else {
                    n.as_f64().map(Variant::Double).unwrap_or(Variant::Null)
                }
            }
            Value::String(s) => Variant::String(s),
            Value::Array(items) => Variant::Array(items.into_iter().map(Variant::from).collect()),
            Value::Object(_) => Variant::Object(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_variant_type_tags() {
        assert_eq!(Variant::Null.variant_type(), VariantType::Null);
        assert_eq!(Variant::from(1).variant_type(), VariantType::Integer);
        assert_eq!(Variant::from(1i64).variant_type(), VariantType::Long);
        assert_eq!(Variant::from(1.5f32).variant_type(), VariantType::Float);
        assert_eq!(Variant::from(1.5).variant_type(), VariantType::Double);
        assert_eq!(Variant::from("a").variant_type(), VariantType::String);
        assert_eq!(Variant::from(true).variant_type(), VariantType::Boolean);
        assert_eq!(
            Variant::time_span_millis(5).variant_type(),
            VariantType::TimeSpan
        );
        assert_eq!(Variant::from(vec![]).variant_type(), VariantType::Array);
    }

    #[test]
    fn test_from_option() {
        assert_eq!(Variant::from(None::<i32>), Variant::Null);
        assert_eq!(Variant::from(Some("x")), Variant::string("x"));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Variant::from(json!(null)), Variant::Null);
        assert_eq!(Variant::from(json!(42)), Variant::Integer(42));
        assert_eq!(
            Variant::from(json!(10_000_000_000i64)),
            Variant::Long(10_000_000_000)
        );
        assert_eq!(Variant::from(json!(2.5)), Variant::Double(2.5));
        assert_eq!(
            Variant::from(json!(["a", true])),
            Variant::Array(vec![Variant::string("a"), Variant::Boolean(true)])
        );

        let object = json!({"name": "Bob"});
        assert_eq!(Variant::from(object.clone()), Variant::Object(object));
    }

    #[test]
    fn test_type_name_display() {
        assert_eq!(VariantType::DateTime.to_string(), "DateTime");
        assert_eq!(Variant::Double(1.0).type_name(), "Double");
    }
}
