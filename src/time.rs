use chrono::{NaiveTime, Timelike};
use thiserror::Error;
use crate::models::CellValue;

/// Why a raw cell could not be read as a time
///
/// Spreadsheets carry stray notes in time columns, so extraction treats every
/// variant as "no data" and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeParseError {
    #[error("cell is empty")]
    Empty,
    #[error("numeric value is not finite")]
    NotFinite,
    #[error("unrecognized time text: '{0}'")]
    Unrecognized(String),
}

/// Hours, minutes and seconds as decimal hours
#[must_use]
pub fn hms_to_hours(hour: u32, minute: u32, second: u32) -> f64 {
    f64::from(hour) + f64::from(minute) / 60.0 + f64::from(second) / 3600.0
}

/// Decimal hours of a chrono time-of-day (seconds precision)
#[must_use]
pub fn time_of_day_to_hours(time: &impl Timelike) -> f64 {
    hms_to_hours(time.hour(), time.minute(), time.second())
}

/// Excel stores times as day fractions below 1; anything else is already hours
fn fraction_or_hours(value: f64) -> f64 {
    if value < 1.0 {
        value * 24.0
    } else {
        value
    }
}

/// Parse a raw cell into decimal hours since midnight
///
/// Accepted shapes, in priority order:
/// - time-of-day and date-time cells
/// - numbers (`< 1` is a day fraction, otherwise hours)
/// - text with an optional trailing `(+N)` day suffix, then `H:MM[:SS]`,
///   `H.MM` (exactly two digits after the dot), a bare float (same fraction
///   rule as numbers) or a bare integer hour
///
/// # Errors
///
/// Returns a [`TimeParseError`] when the cell is blank or its content does not
/// match any supported shape.
pub fn parse_cell_time(value: &CellValue) -> Result<f64, TimeParseError> {
    match value {
        CellValue::Empty => Err(TimeParseError::Empty),
        CellValue::Time(t) => Ok(time_of_day_to_hours(t)),
        CellValue::DateTime(dt) => Ok(time_of_day_to_hours(dt)),
        CellValue::Number(v) => {
            if v.is_finite() {
                Ok(fraction_or_hours(*v))
            } else {
                Err(TimeParseError::NotFinite)
            }
        }
        CellValue::Text(s) => parse_time_str(s),
    }
}

/// [`parse_cell_time`] with failures folded into `None`
#[must_use]
pub fn parse_time(value: &CellValue) -> Option<f64> {
    parse_cell_time(value).ok()
}

/// Parse time text such as `"7:30"`, `"07:30 (+1)"`, `"7.30"` or `"0.3125"`
///
/// # Errors
///
/// Returns a [`TimeParseError`] for blank or unrecognized text.
pub fn parse_time_str(raw: &str) -> Result<f64, TimeParseError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TimeParseError::Empty);
    }
    let unrecognized = || TimeParseError::Unrecognized(trimmed.to_string());

    let (body, plus_days) = split_day_suffix(trimmed);
    let extra = 24.0 * f64::from(plus_days);
    let normalized = body.replace(',', ".");

    if normalized.contains(':') {
        return parse_colon_time(&normalized)
            .map(|hours| hours + extra)
            .ok_or_else(unrecognized);
    }

    if let Some((h_part, m_part)) = normalized.split_once('.') {
        if m_part.len() == 2
            && is_all_digits(m_part)
            && is_all_digits(h_part)
        {
            let hours: u32 = h_part.parse().map_err(|_| unrecognized())?;
            let minutes: u32 = m_part.parse().map_err(|_| unrecognized())?;
            return Ok(f64::from(hours) + f64::from(minutes) / 60.0 + extra);
        }
    }

    if let Ok(value) = normalized.parse::<f64>() {
        if value.is_finite() {
            return Ok(fraction_or_hours(value) + extra);
        }
    }

    if is_all_digits(&normalized) {
        let hours: u32 = normalized.parse().map_err(|_| unrecognized())?;
        return Ok(f64::from(hours) + extra);
    }

    Err(unrecognized())
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// `H:MM[:SS]`; empty components count as zero
fn parse_colon_time(s: &str) -> Option<f64> {
    let parts: Vec<&str> = s.split(':').map(str::trim).collect();
    let component = |idx: usize| -> Option<i64> {
        match parts.get(idx) {
            None => Some(0),
            Some(p) if p.is_empty() => Some(0),
            Some(p) => p.parse::<i64>().ok(),
        }
    };
    let hours = component(0)?;
    let minutes = component(1)?;
    let seconds = component(2)?;

    #[allow(clippy::cast_precision_loss)]
    let total = hours as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0;
    Some(total)
}

/// Split a trailing `(+N)` day marker off a time string
///
/// Returns the remaining text and `N` (0 when there is no marker).
#[must_use]
pub fn split_day_suffix(s: &str) -> (&str, u32) {
    let trimmed = s.trim_end();
    let Some(without_paren) = trimmed.strip_suffix(')') else {
        return (trimmed, 0);
    };
    let Some(open) = without_paren.rfind('(') else {
        return (trimmed, 0);
    };
    let inner = without_paren[open + 1..].trim();
    let Some(digits) = inner.strip_prefix('+') else {
        return (trimmed, 0);
    };
    let digits = digits.trim();
    if !is_all_digits(digits) {
        return (trimmed, 0);
    }
    match digits.parse::<u32>() {
        Ok(days) => (without_paren[..open].trim(), days),
        Err(_) => (trimmed, 0),
    }
}

/// Split decimal hours into (hour, minute) of the day, minute rounding rolls
/// over into the next hour
fn hour_minute(t: f64) -> (u32, u32) {
    let in_day = t.rem_euclid(24.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut hour = in_day.floor() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let mut minute = (in_day.fract() * 60.0).round() as u32;
    if minute == 60 {
        hour = (hour + 1) % 24;
        minute = 0;
    }
    (hour % 24, minute)
}

/// Render decimal hours as `HH:MM` of the day (day information is dropped)
#[must_use]
pub fn format_time_hhmm(t: f64) -> String {
    let (hour, minute) = hour_minute(t);
    format!("{hour:02}:{minute:02}")
}

/// Canonical persisted form: `HH:MM`, or `HH:MM (+d)` for later days
///
/// Negative values are normalized into the first day before formatting.
#[must_use]
pub fn format_time_decimal(t: f64) -> String {
    let t = if t < 0.0 { t.rem_euclid(24.0) } else { t };
    #[allow(clippy::cast_possible_truncation)]
    let days = (t / 24.0).floor() as i64;
    let (hour, minute) = hour_minute(t);
    if days == 0 {
        format!("{hour:02}:{minute:02}")
    } else {
        format!("{hour:02}:{minute:02} (+{days})")
    }
}

/// Convert decimal hours to a time of day (minute precision)
#[must_use]
pub fn hours_to_time_of_day(t: f64) -> NaiveTime {
    let (hour, minute) = hour_minute(t);
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

/// Make one train's times monotonic across midnight
///
/// Times must be in the order the train passes its stations. Whenever a
/// reading falls more than 12 hours below the previous adjusted reading the
/// train is taken to have crossed midnight and every following reading moves
/// one day later. The day offset never goes back down.
#[must_use]
pub fn apply_midnight_correction(raw_times: &[f64]) -> Vec<f64> {
    let mut day_offset = 0.0;
    let mut prev_adjusted: Option<f64> = None;

    raw_times
        .iter()
        .map(|&raw| {
            let mut adjusted = raw + day_offset * 24.0;
            if let Some(prev) = prev_adjusted {
                if prev - adjusted > 12.0 {
                    day_offset += 1.0;
                    adjusted += 24.0;
                }
            }
            prev_adjusted = Some(adjusted);
            adjusted
        })
        .collect()
}

/// Shift in hours between a stored time and a newly entered time of day
///
/// The stored value is reduced to its time of day first; the result is
/// wrapped into `[-12, 12]` so that edits across midnight pick the short way
/// round (23:30 → 00:15 is +0.75 h, not −23.25 h).
#[must_use]
pub fn edit_delta(old_decimal: f64, new_time: &impl Timelike) -> f64 {
    let new_decimal = time_of_day_to_hours(new_time);
    let delta = new_decimal - old_decimal.rem_euclid(24.0);
    if delta > 12.0 {
        delta - 24.0
    } else if delta < -12.0 {
        delta + 24.0
    } else {
        delta
    }
}
