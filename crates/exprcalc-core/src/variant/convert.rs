//! Variant conversions
//!
//! Conversions between present values are lenient: a value that cannot be
//! represented in the target type converts to [`Variant::Null`] instead of
//! failing, and `Null` itself converts to the target's zero value.

use super::value::{millis, Variant, VariantType};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

impl Variant {
    /// Convert to another variant type
    ///
    /// Returns [`Variant::Null`] when the value has no representation in the
    /// target type.
    pub fn convert(&self, target: VariantType) -> Variant {
        if self.variant_type() == target {
            return self.clone();
        }

        let converted = match target {
            VariantType::Null => Some(Variant::Null),
            VariantType::Integer => self.to_long().map(|n| Variant::Integer(saturate_i32(n))),
            VariantType::Long => self.to_long().map(Variant::Long),
            VariantType::Float => self.to_double().map(|n| Variant::Float(n as f32)),
            VariantType::Double => self.to_double().map(Variant::Double),
            VariantType::String => Some(Variant::String(self.as_string())),
            VariantType::Boolean => self.to_boolean().map(Variant::Boolean),
            VariantType::DateTime => self.to_datetime().map(Variant::DateTime),
            VariantType::TimeSpan => self.to_time_span().map(Variant::TimeSpan),
            VariantType::Object => match self {
                Variant::Null => None,
                other => Some(Variant::Object(other.to_json())),
            },
            VariantType::Array => match self {
                Variant::Null => None,
                other => Some(Variant::Array(vec![other.clone()])),
            },
        };

        converted.unwrap_or(Variant::Null)
    }

    /// Try to get the value as a 64-bit integer (fractions are truncated)
    pub fn to_long(&self) -> Option<i64> {
        match self {
            Variant::Null => Some(0),
            Variant::Integer(n) => Some(i64::from(*n)),
            Variant::Long(n) => Some(*n),
            Variant::Float(n) => truncate(f64::from(*n)),
            Variant::Double(n) => truncate(*n),
            Variant::Boolean(b) => Some(i64::from(*b)),
            Variant::String(s) => parse_long(s),
            Variant::DateTime(dt) => Some(dt.timestamp_millis()),
            Variant::TimeSpan(d) => Some(d.num_milliseconds()),
            Variant::Object(value) => json_number(value).and_then(truncate),
            Variant::Array(_) => None,
        }
    }

    /// Try to get the value as a double
    pub fn to_double(&self) -> Option<f64> {
        match self {
            Variant::Null => Some(0.0),
            Variant::Integer(n) => Some(f64::from(*n)),
            Variant::Long(n) => Some(*n as f64),
            Variant::Float(n) => Some(f64::from(*n)),
            Variant::Double(n) => Some(*n),
            Variant::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Variant::String(s) => parse_decimal(s),
            Variant::DateTime(dt) => Some(dt.timestamp_millis() as f64),
            Variant::TimeSpan(d) => Some(d.num_milliseconds() as f64),
            Variant::Object(value) => json_number(value),
            Variant::Array(_) => None,
        }
    }

    /// Try to get the value as a boolean
    pub fn to_boolean(&self) -> Option<bool> {
        match self {
            Variant::Null => Some(false),
            Variant::Boolean(b) => Some(*b),
            Variant::Integer(n) => Some(*n != 0),
            Variant::Long(n) => Some(*n != 0),
            Variant::Float(n) => Some(*n != 0.0),
            Variant::Double(n) => Some(*n != 0.0),
            Variant::String(s) => parse_boolean(s),
            Variant::Object(serde_json::Value::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Try to get the value as a UTC date/time
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Variant::DateTime(dt) => Some(*dt),
            Variant::String(s) => parse_datetime(s),
            Variant::Object(serde_json::Value::String(s)) => parse_datetime(s),
            Variant::TimeSpan(_) | Variant::Array(_) => None,
            other => other
                .to_long()
                .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        }
    }

    /// Try to get the value as a time span
    pub fn to_time_span(&self) -> Option<Duration> {
        match self {
            Variant::TimeSpan(d) => Some(*d),
            Variant::String(s) => parse_time_span(s).or_else(|| parse_long(s).map(millis)),
            Variant::DateTime(_) | Variant::Array(_) => None,
            other => other.to_long().map(millis),
        }
    }

    /// Get the value as an integer, or 0
    pub fn as_integer(&self) -> i32 {
        self.to_long().map(saturate_i32).unwrap_or(0)
    }

    /// Get the value as a long, or 0
    pub fn as_long(&self) -> i64 {
        self.to_long().unwrap_or(0)
    }

    /// Get the value as a float, or 0
    pub fn as_float(&self) -> f32 {
        self.to_double().map(|n| n as f32).unwrap_or(0.0)
    }

    /// Get the value as a double, or 0
    pub fn as_double(&self) -> f64 {
        self.to_double().unwrap_or(0.0)
    }

    /// Get the value as a boolean, or false
    pub fn as_boolean(&self) -> bool {
        self.to_boolean().unwrap_or(false)
    }

    /// Get the value as a date/time, or the Unix epoch
    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.to_datetime().unwrap_or_default()
    }

    /// Get the value as a time span, or zero
    pub fn as_time_span(&self) -> Duration {
        self.to_time_span().unwrap_or_else(Duration::zero)
    }

    /// Canonical text form
    pub fn as_string(&self) -> String {
        match self {
            Variant::Null => String::new(),
            Variant::Integer(n) => n.to_string(),
            Variant::Long(n) => n.to_string(),
            Variant::Float(n) => n.to_string(),
            Variant::Double(n) => n.to_string(),
            Variant::String(s) => s.clone(),
            Variant::Boolean(true) => "true".to_string(),
            Variant::Boolean(false) => "false".to_string(),
            Variant::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::Millis, true),
            Variant::TimeSpan(d) => format_time_span(*d),
            Variant::Object(value) => value.to_string(),
            Variant::Array(items) => items
                .iter()
                .map(Variant::as_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Convert to a JSON value
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Variant::Null => Value::Null,
            Variant::Integer(n) => Value::from(*n),
            Variant::Long(n) => Value::from(*n),
            Variant::Float(n) => serde_json::Number::from_f64(f64::from(*n))
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Variant::Double(n) => serde_json::Number::from_f64(*n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Variant::Boolean(b) => Value::Bool(*b),
            Variant::String(s) => Value::String(s.clone()),
            Variant::DateTime(_) | Variant::TimeSpan(_) => Value::String(self.as_string()),
            Variant::Object(value) => value.clone(),
            Variant::Array(items) => Value::Array(items.iter().map(Variant::to_json).collect()),
        }
    }
}

fn saturate_i32(n: i64) -> i32 {
    n.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

fn truncate(n: f64) -> Option<i64> {
    if n.is_finite() {
        Some(n.trunc() as i64)
    } else {
        None
    }
}

fn json_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        serde_json::Value::String(s) => parse_decimal(s),
        _ => None,
    }
}

fn parse_long(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| parse_decimal(s).and_then(truncate))
}

fn parse_boolean(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        parse_decimal(s).map(|n| n != 0.0)
    }
}

/// Parse locale-independent decimal text: `[+-]digits[.digits][e[+-]digits]`
///
/// Special values such as `NaN` or `inf` are not numbers here, and neither
/// is text whose value overflows to infinity.
pub fn parse_decimal(s: &str) -> Option<f64> {
    let s = s.trim();
    if !is_decimal(s) {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_decimal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let digits = |i: &mut usize| {
        let start = *i;
        while bytes.get(*i).map_or(false, u8::is_ascii_digit) {
            *i += 1;
        }
        *i - start
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let mut mantissa = digits(&mut i);
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        mantissa += digits(&mut i);
    }
    if mantissa == 0 {
        return false;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if digits(&mut i) == 0 {
            return false;
        }
    }
    i == bytes.len()
}

/// Parse RFC 3339, `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD` (UTC)
pub fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Parse `[-][d.]hh:mm:ss[.fff]`
pub fn parse_time_span(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (negative, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let mut parts = body.split(':');
    let (first, minutes, seconds) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    let (days, hours) = match first.split_once('.') {
        Some((d, h)) => (parse_digits(d)?, parse_digits(h)?),
        None => (0, parse_digits(first)?),
    };
    let minutes = parse_digits(minutes)?;
    let (seconds, fraction) = match seconds.split_once('.') {
        Some((s, f)) => (parse_digits(s)?, parse_fraction(f)?),
        None => (parse_digits(seconds)?, 0),
    };

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let total = days
        .checked_mul(MILLIS_PER_DAY)?
        .checked_add(hours.checked_mul(MILLIS_PER_HOUR)?)?
        .checked_add(minutes * MILLIS_PER_MINUTE)?
        .checked_add(seconds * MILLIS_PER_SECOND)?
        .checked_add(fraction)?;

    Some(millis(if negative { -total } else { total }))
}

fn parse_digits(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Fraction of a second as milliseconds (extra digits are dropped)
fn parse_fraction(s: &str) -> Option<i64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits: String = s.chars().take(3).collect();
    format!("{:0<3}", digits).parse().ok()
}

/// Format as `[-][d.]hh:mm:ss[.fff]`
pub fn format_time_span(d: Duration) -> String {
    let ms = d.num_milliseconds();
    let sign = if ms < 0 { "-" } else { "" };
    let total = ms.unsigned_abs();

    let day = MILLIS_PER_DAY as u64;
    let days = total / day;
    let rest = total % day;
    let hours = rest / MILLIS_PER_HOUR as u64;
    let minutes = rest % MILLIS_PER_HOUR as u64 / MILLIS_PER_MINUTE as u64;
    let seconds = rest % MILLIS_PER_MINUTE as u64 / MILLIS_PER_SECOND as u64;
    let fraction = rest % MILLIS_PER_SECOND as u64;

    let mut text = String::from(sign);
    if days > 0 {
        text.push_str(&format!("{}.", days));
    }
    text.push_str(&format!("{:02}:{:02}:{:02}", hours, minutes, seconds));
    if fraction > 0 {
        text.push_str(&format!(".{:03}", fraction));
    }
    text
}
