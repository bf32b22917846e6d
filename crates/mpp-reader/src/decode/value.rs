//! Bounded little-endian reads and value conversions.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use mpp_model::{Duration, TimeUnit};

use crate::layout::{DateEncoding, FieldDef, FieldKind, IntWidth};

pub(crate) fn slice(data: &[u8], offset: usize, len: usize) -> Option<&[u8]> {
    data.get(offset..offset.checked_add(len)?)
}

pub(crate) fn read_u8(data: &[u8], offset: usize) -> Option<u8> {
    data.get(offset).copied()
}

pub(crate) fn read_u16(data: &[u8], offset: usize) -> Option<u16> {
    let bytes = slice(data, offset, 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

pub(crate) fn read_u24(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = slice(data, offset, 3)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0]))
}

pub(crate) fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = slice(data, offset, 4)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

pub(crate) fn read_i32(data: &[u8], offset: usize) -> Option<i32> {
    read_u32(data, offset).map(|v| v as i32)
}

/// Six-byte unsigned little-endian integer.
pub(crate) fn read_u48(data: &[u8], offset: usize) -> Option<u64> {
    let bytes = slice(data, offset, 6)?;
    let mut wide = [0u8; 8];
    wide[..6].copy_from_slice(bytes);
    Some(u64::from_le_bytes(wide))
}

pub(crate) fn read_f64(data: &[u8], offset: usize) -> Option<f64> {
    let bytes: [u8; 8] = slice(data, offset, 8)?.try_into().ok()?;
    Some(f64::from_le_bytes(bytes))
}

/// Borrowed UTF-16LE text, up to (not including) the first nul unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WideStr<'a>(&'a [u8]);

impl<'a> WideStr<'a> {
    /// Wrap `bytes`, stopping at the first nul unit. A trailing odd byte is
    /// ignored.
    #[must_use]
    pub fn new(bytes: &'a [u8]) -> Self {
        let units = bytes.len() / 2;
        let end = (0..units)
            .find(|&i| bytes[2 * i] == 0 && bytes[2 * i + 1] == 0)
            .unwrap_or(units);
        Self(&bytes[..end * 2])
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw UTF-16LE bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.0
    }

    fn units(&self) -> impl Iterator<Item = u16> + 'a {
        self.0
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
    }
}

impl fmt::Display for WideStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write as _;
        for ch in char::decode_utf16(self.units()) {
            f.write_char(ch.unwrap_or(char::REPLACEMENT_CHARACTER))?;
        }
        Ok(())
    }
}

/// Menu captions mark access keys with `&`; `&&` is a literal ampersand.
pub(crate) fn remove_ampersands(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '&' {
            if chars.peek() == Some(&'&') {
                out.push('&');
                chars.next();
            }
            continue;
        }
        out.push(ch);
    }
    out
}

/// Decoded value of one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Null,
    Int(i64),
    Float(f64),
    Flag(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    Duration(Duration),
    Text(WideStr<'a>),
}

/// Integer view of a field: the raw value of integer, flag and date kinds.
pub(crate) fn field_int(data: &[u8], field: &FieldDef) -> Option<i64> {
    let at = field.offset;
    match field.kind {
        FieldKind::U8 => read_u8(data, at).map(i64::from),
        FieldKind::U16 | FieldKind::Date | FieldKind::Flag { .. } => {
            read_u16(data, at).map(i64::from)
        }
        FieldKind::I32 | FieldKind::Duration { .. } => read_i32(data, at).map(i64::from),
        FieldKind::Timestamp => read_u32(data, at).map(i64::from),
        FieldKind::Scaled { width, .. } => match width {
            IntWidth::U16 => read_u16(data, at).map(i64::from),
            IntWidth::I32 => read_i32(data, at).map(i64::from),
            IntWidth::U48 => read_u48(data, at).and_then(|v| i64::try_from(v).ok()),
        },
        FieldKind::F64 { .. } | FieldKind::Work | FieldKind::Text { .. } => None,
    }
}

pub(crate) fn field_float(data: &[u8], field: &FieldDef) -> Option<f64> {
    match field.kind {
        FieldKind::F64 { divisor } => read_f64(data, field.offset).map(|v| v / divisor),
        FieldKind::Work => read_f64(data, field.offset),
        FieldKind::Scaled { divisor, .. } => field_int(data, field).map(|v| v as f64 / divisor),
        _ => field_int(data, field).map(|v| v as f64),
    }
}

pub(crate) fn field_flag(data: &[u8], field: &FieldDef) -> Option<bool> {
    match field.kind {
        FieldKind::Flag { mask } => read_u16(data, field.offset).map(|v| v & mask != 0),
        _ => field_int(data, field).map(|v| v != 0),
    }
}

/// Single-byte text up to the first nul, read as Latin-1; empty text is
/// absent.
pub(crate) fn ansi_text(bytes: &[u8]) -> Option<String> {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let text: String = bytes[..end].iter().copied().map(char::from).collect();
    (!text.is_empty()).then_some(text)
}

pub(crate) fn field_text<'a>(data: &'a [u8], field: &FieldDef) -> Option<WideStr<'a>> {
    let FieldKind::Text { max_bytes } = field.kind else {
        return None;
    };
    let end = field.offset.checked_add(max_bytes)?.min(data.len());
    let text = WideStr::new(data.get(field.offset..end)?);
    (!text.is_empty()).then_some(text)
}

pub(crate) fn field_value<'a>(
    data: &'a [u8],
    field: &FieldDef,
    dates: &DateEncoding,
) -> FieldValue<'a> {
    let value = match field.kind {
        FieldKind::U8 | FieldKind::U16 | FieldKind::I32 => field_int(data, field).map(FieldValue::Int),
        FieldKind::F64 { .. } | FieldKind::Scaled { .. } => {
            field_float(data, field).map(FieldValue::Float)
        }
        FieldKind::Flag { .. } => field_flag(data, field).map(FieldValue::Flag),
        FieldKind::Date => read_u16(data, field.offset)
            .and_then(|days| date(dates, days))
            .map(FieldValue::Date),
        FieldKind::Timestamp => field_timestamp(data, field, dates).map(FieldValue::Timestamp),
        FieldKind::Duration { .. } => field_duration(data, field, dates).map(FieldValue::Duration),
        FieldKind::Work => field_work(data, field).map(FieldValue::Duration),
        FieldKind::Text { .. } => field_text(data, field).map(FieldValue::Text),
    };
    value.unwrap_or(FieldValue::Null)
}

pub(crate) fn field_timestamp(
    data: &[u8],
    field: &FieldDef,
    dates: &DateEncoding,
) -> Option<NaiveDateTime> {
    match field.kind {
        FieldKind::Timestamp => timestamp(dates, data.get(field.offset..)?),
        FieldKind::Date => {
            let day = date(dates, read_u16(data, field.offset)?)?;
            Some(day.and_time(NaiveTime::MIN))
        }
        _ => None,
    }
}

pub(crate) fn field_duration(
    data: &[u8],
    field: &FieldDef,
    dates: &DateEncoding,
) -> Option<Duration> {
    let FieldKind::Duration { units_offset } = field.kind else {
        return None;
    };
    let ticks = read_i32(data, field.offset)?;
    let units = read_u16(data, units_offset)?;
    Some(duration(dates, ticks, units))
}

pub(crate) fn field_work(data: &[u8], field: &FieldDef) -> Option<Duration> {
    match field.kind {
        FieldKind::Work => read_f64(data, field.offset).map(work),
        FieldKind::Scaled { .. } => field_float(data, field).map(Duration::hours),
        _ => None,
    }
}

/// Day count from the epoch; `0xFFFF` is null.
pub(crate) fn date(dates: &DateEncoding, days: u16) -> Option<NaiveDate> {
    if days == 0xFFFF {
        return None;
    }
    dates
        .epoch_date()?
        .checked_add_signed(TimeDelta::days(i64::from(days)))
}

/// Decode a timestamp at the start of `bytes`: `u16` ticks since midnight,
/// then `u16` days since the epoch. Day counts below 100 and `0xFFFF` are
/// null; a time of `0xFFFF` is midnight.
pub(crate) fn timestamp(dates: &DateEncoding, bytes: &[u8]) -> Option<NaiveDateTime> {
    let time = match read_u16(bytes, 0)? {
        0xFFFF => 0,
        time => time,
    };
    let days = read_u16(bytes, 2)?;
    if days < 100 || days == 0xFFFF {
        return None;
    }
    dates
        .epoch_date()?
        .and_time(NaiveTime::MIN)
        .checked_add_signed(TimeDelta::days(i64::from(days)))?
        .checked_add_signed(ticks_to_delta(dates, i64::from(time)))
}

fn ticks_to_delta(dates: &DateEncoding, ticks: i64) -> TimeDelta {
    TimeDelta::seconds(ticks * 60 / dates.ticks_per_minute.max(1))
}

/// Minutes since midnight for a tick count, wrapped to one day.
pub(crate) fn time_of_day(dates: &DateEncoding, ticks: u16) -> NaiveTime {
    let seconds = i64::from(ticks) * 60 / dates.ticks_per_minute.max(1);
    NaiveTime::MIN.overflowing_add_signed(TimeDelta::seconds(seconds)).0
}

pub(crate) fn ticks_to_minutes(dates: &DateEncoding, ticks: u32) -> u32 {
    let per_minute = u32::try_from(dates.ticks_per_minute.max(1)).unwrap_or(1);
    ticks / per_minute
}

/// Working minutes in one unit: 8h days, 40h weeks, 20-day months; elapsed
/// units count wall-clock time.
const fn minutes_per_unit(units: TimeUnit) -> Option<f64> {
    Some(match units {
        TimeUnit::Minutes | TimeUnit::ElapsedMinutes => 1.0,
        TimeUnit::Hours | TimeUnit::ElapsedHours => 60.0,
        TimeUnit::Days => 480.0,
        TimeUnit::ElapsedDays => 1440.0,
        TimeUnit::Weeks => 2400.0,
        TimeUnit::ElapsedWeeks => 10080.0,
        TimeUnit::Months => 9600.0,
        TimeUnit::ElapsedMonths => 43200.0,
        TimeUnit::Percent | TimeUnit::ElapsedPercent => return None,
    })
}

/// Tick count with its units code; unknown codes fall back to days.
pub(crate) fn duration(dates: &DateEncoding, ticks: i32, code: u16) -> Duration {
    let units = TimeUnit::from_code(code).unwrap_or(TimeUnit::Days);
    let value = match minutes_per_unit(units) {
        Some(minutes) => f64::from(ticks) / (dates.ticks_per_minute as f64 * minutes),
        None => f64::from(ticks),
    };
    Duration::new(value, units)
}

/// Work is stored in thousandths of a minute.
pub(crate) fn work(raw: f64) -> Duration {
    Duration::hours(raw / 60_000.0)
}
