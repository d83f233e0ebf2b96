// Pickup Tracker - core/normalize.rs
//
// Row normaliser: turns one raw sheet row into a typed `Record`.
// All "stringly-typed cell" handling lives here: text coercion, date-serial
// and textual date decoding, and pt-BR currency formatting.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::columns::ColumnMap;
use crate::core::model::{Cell, Record, Status};
use crate::util::constants;
use chrono::{DateTime, Duration, Local, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Largest serial a 1900-system workbook can hold (9999-12-31).
const MAX_DATE_SERIAL: f64 = 2_958_465.0;

/// Serial of the fictitious 1900-02-29 that the 1900 date system inherited.
const PHANTOM_LEAP_DAY_SERIAL: i64 = 60;

/// Naive date-time formats tried for text date cells, in order.
/// Naive values are interpreted as local time.
const TEXT_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// ISO date-only text, read as midnight UTC.
const TEXT_ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// pt-BR date-only text, read as midnight local time.
const TEXT_LOCAL_DATE_FORMAT: &str = "%d/%m/%Y";

static EMPTY_CELL: Cell = Cell::Empty;

/// Normalise one raw row using the resolved column indices.
///
/// Never fails: undecodable dates become `None` and unparseable amounts
/// become zero, leaving rejection to the row filter.
pub fn normalize_row(row: &[Cell], columns: &ColumnMap) -> Record {
    let value_cell = columns
        .invoice_value
        .map(|idx| cell_at(row, idx))
        .unwrap_or(&EMPTY_CELL);

    Record {
        reference: trimmed_text(cell_at(row, columns.reference)),
        last_event: trimmed_text(cell_at(row, columns.last_event)),
        last_event_date: decode_date(cell_at(row, columns.last_event_date)),
        service_type: trimmed_text(cell_at(row, columns.service_type)),
        invoice_value: format_currency(parse_amount(&trimmed_text(value_cell))),
        status: Status::Pending,
    }
}

fn cell_at(row: &[Cell], idx: usize) -> &Cell {
    row.get(idx).unwrap_or(&EMPTY_CELL)
}

fn trimmed_text(cell: &Cell) -> String {
    cell.to_text().trim().to_string()
}

// =============================================================================
// Dates
// =============================================================================

/// Decode a date cell into an ISO-8601 UTC timestamp string.
///
/// Numeric cells are date-serials; text cells go through `parse_text_date`.
/// A zero serial counts as an empty cell.
pub fn decode_date(cell: &Cell) -> Option<String> {
    let instant = match cell {
        Cell::Number(serial) if *serial != 0.0 => local_to_utc(serial_to_naive(*serial)?)?,
        Cell::Text(text) => parse_text_date(text)?,
        _ => return None,
    };
    Some(to_iso(&instant))
}

/// Format an instant the way records store it: `2023-03-15T03:00:00.000Z`.
pub fn to_iso(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Convert a 1900-system date-serial into a calendar date-time.
///
/// The integer part counts days; serials up to 60 are offset by one day
/// because the format treats 1900 as a leap year (serial 60, the phantom
/// Feb 29, lands on Mar 1). The fractional part is the time of day: rounded
/// to the second (carrying into the next day), then truncated to the minute.
pub fn serial_to_naive(serial: f64) -> Option<NaiveDateTime> {
    if !serial.is_finite() || !(0.0..=MAX_DATE_SERIAL).contains(&serial) {
        return None;
    }

    let mut days = serial.trunc() as i64;
    let mut seconds = ((serial - serial.trunc()) * constants::SECONDS_PER_DAY as f64).round() as i64;
    if seconds >= constants::SECONDS_PER_DAY {
        seconds -= constants::SECONDS_PER_DAY;
        days += 1;
    }
    seconds -= seconds % 60;

    let epoch = if days <= PHANTOM_LEAP_DAY_SERIAL {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    let midnight = epoch
        .checked_add_signed(Duration::days(days))?
        .and_hms_opt(0, 0, 0)?;
    midnight.checked_add_signed(Duration::seconds(seconds))
}

/// Interpret a naive wall-clock time in the local zone.
///
/// Ambiguous times (DST fall-back) take the earlier instant; times inside a
/// DST gap are moved forward by an hour.
fn local_to_utc(naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            Local
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
        })
        .map(|dt| dt.with_timezone(&Utc))
}

/// General parse of a textual date.
///
/// Strategy:
///   1. RFC 3339 / ISO 8601 with offset.
///   2. Naive date-time formats (ISO with `T` or space, `dd/mm/yyyy`), local time.
///   3. ISO date only, midnight UTC.
///   4. `dd/mm/yyyy` date only, local midnight.
pub fn parse_text_date(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in TEXT_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return local_to_utc(ndt);
        }
    }

    if let Ok(nd) = NaiveDate::parse_from_str(trimmed, TEXT_ISO_DATE_FORMAT) {
        return Some(Utc.from_utc_datetime(&nd.and_hms_opt(0, 0, 0)?));
    }

    if let Ok(nd) = NaiveDate::parse_from_str(trimmed, TEXT_LOCAL_DATE_FORMAT) {
        return local_to_utc(nd.and_hms_opt(0, 0, 0)?);
    }

    tracing::trace!(raw = trimmed, "Unparseable date text");
    None
}

// =============================================================================
// Currency
// =============================================================================

/// Parse an amount written with a decimal comma.
///
/// The first comma becomes a period, then the longest leading number is read
/// and anything after it ignored (`"150,00 BRL"` is 150, `"1.234,56"` is
/// 1.234). No leading number, or a non-finite one, is zero.
pub fn parse_amount(raw: &str) -> f64 {
    let text = raw
        .trim()
        .replacen(constants::DECIMAL_SEPARATOR, ".", 1);
    let len = numeric_prefix_len(text.as_bytes());
    if len == 0 {
        return 0.0;
    }
    text[..len]
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Length of the leading `[+-]digits[.digits][e[+-]digits]` run, or 0 if
/// there are no mantissa digits. An exponent without digits is left out.
fn numeric_prefix_len(bytes: &[u8]) -> usize {
    let digits_from = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_end = digits_from(i);
    let mut end = int_end;
    let mut has_digits = int_end > i;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 || has_digits {
            has_digits |= frac_end > end + 1;
            end = frac_end;
        }
    }
    if !has_digits {
        return 0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut j = end + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_end = digits_from(j);
        if exp_end > j {
            end = exp_end;
        }
    }
    end
}

/// Format an amount as pt-BR currency text, e.g. `R$ 1.234,56`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };

    let digits = (cents / 100).to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(constants::THOUSANDS_SEPARATOR);
        }
        grouped.push(ch);
    }

    format!(
        "{sign}{}{}{grouped}{}{:02}",
        constants::CURRENCY_SYMBOL,
        constants::CURRENCY_SPACE,
        constants::DECIMAL_SEPARATOR,
        cents % 100
    )
}
