//! Date and time functions

use super::{arg, integer_arg};
use crate::error::{EvalResult, EvaluationError};
use chrono::{Datelike, Duration, NaiveDate, TimeZone, Utc};
use exprcalc_core::{Variant, VariantOperations};

const MILLIS_PER_SECOND: i64 = 1_000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

fn datetime_arg(function: &str, args: &[Variant], index: usize) -> EvalResult<chrono::DateTime<Utc>> {
    let value = arg(args, index);
    value.to_datetime().ok_or_else(|| {
        EvaluationError::Argument(format!(
            "{}: argument {} ({}) is not a date",
            function,
            index + 1,
            value.type_name()
        ))
    })
}

/// NOW function
pub fn fn_now(_args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    Ok(Variant::DateTime(Utc::now()))
}

/// DATE function
///
/// - `DATE(value)`: milliseconds since the Unix epoch, or a date string
/// - `DATE(year, month[, day[, hour[, minute[, second[, millisecond]]]]])`
///   with 1-based months and days
pub fn fn_date(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    if args.len() == 1 {
        return datetime_arg("DATE", args, 0).map(Variant::DateTime);
    }

    let mut parts = [0i64, 1, 1, 0, 0, 0, 0];
    for (index, part) in parts.iter_mut().enumerate().take(args.len()) {
        *part = integer_arg("DATE", args, index)?;
    }
    let [year, month, day, hour, minute, second, millis] = parts;

    let invalid = || {
        EvaluationError::Argument(format!(
            "DATE: {}-{}-{} {}:{}:{}.{} is not a valid date",
            year, month, day, hour, minute, second, millis
        ))
    };
    let component = |n: i64| u32::try_from(n).map_err(|_| invalid());

    let year = i32::try_from(year).map_err(|_| invalid())?;
    let naive = NaiveDate::from_ymd_opt(year, component(month)?, component(day)?)
        .and_then(|date| {
            date.and_hms_milli_opt(
                component(hour).ok()?,
                component(minute).ok()?,
                component(second).ok()?,
                component(millis).ok()?,
            )
        })
        .ok_or_else(invalid)?;

    Ok(Variant::DateTime(Utc.from_utc_datetime(&naive)))
}

/// DAYOFWEEK function: 0 = Sunday ... 6 = Saturday
pub fn fn_dayofweek(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    let dt = datetime_arg("DAYOFWEEK", args, 0)?;
    Ok(Variant::Integer(dt.weekday().num_days_from_sunday() as i32))
}

/// TICKS function: milliseconds since the Unix epoch (now, or of a date)
pub fn fn_ticks(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    let dt = if args.is_empty() {
        Utc::now()
    } else {
        datetime_arg("TICKS", args, 0)?
    };
    Ok(Variant::Long(dt.timestamp_millis()))
}

/// TIMESPAN function
///
/// - `TIMESPAN(value)`: milliseconds, or `[-][d.]hh:mm:ss[.fff]` text
/// - `TIMESPAN(hours, minutes, seconds)`
/// - `TIMESPAN(days, hours, minutes, seconds[, milliseconds])`
pub fn fn_timespan(args: &[Variant], _ops: &VariantOperations) -> EvalResult<Variant> {
    if args.len() == 1 {
        let value = arg(args, 0);
        return value.to_time_span().map(Variant::TimeSpan).ok_or_else(|| {
            EvaluationError::Argument(format!(
                "TIMESPAN: '{}' is not a time span",
                value.as_string()
            ))
        });
    }

    let units: &[i64] = match args.len() {
        3 => &[MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND],
        4 => &[MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND],
        5 => &[MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, 1],
        actual => {
            return Err(EvaluationError::ArgumentCount {
                function: "TIMESPAN".to_string(),
                expected: "1, 3, 4 or 5".to_string(),
                actual,
            })
        }
    };

    let mut total: i64 = 0;
    for (index, unit) in units.iter().enumerate() {
        let part = integer_arg("TIMESPAN", args, index)?
            .checked_mul(*unit)
            .and_then(|ms| total.checked_add(ms));
        total = part.ok_or_else(|| {
            EvaluationError::Argument("TIMESPAN: value is out of range".to_string())
        })?;
    }

    Ok(Variant::TimeSpan(Duration::milliseconds(total.max(-i64::MAX))))
}
