//! Calendars: weekday rules and exceptions from the hours blob.
//!
//! The blob holds seven day blocks, Sunday first. A block whose flag is
//! 1 carries no hours of its own: derived calendars inherit the day, base
//! calendars fall back to the standard week. Exception blocks follow when
//! the blob is long enough to hold their count.

use chrono::NaiveTime;
use mpp_model::{
    Calendar, CalendarException, CalendarId, DayRule, Diagnostic, DiagnosticReason, EntityKind,
    ResourceId, WorkingPeriod,
};

use super::{BuildContext, var_string};
use crate::decode::WideStr;
use crate::decode::value::{self, read_i32, read_u16, read_u32, slice};
use crate::error::Result;
use crate::layout::{DateEncoding, WeekLayout};

const DAY_FLAG_DEFAULT: u16 = 1;

pub(crate) fn build_calendars(ctx: &mut BuildContext<'_>) -> Result<usize> {
    let format = ctx.layout;
    let layout = &format.calendars;
    let dates = &format.dates;
    ctx.for_each_record(&layout.table, EntityKind::Calendar, |builder, uid, record| {
        let mut calendar = Calendar::new(CalendarId::new(uid));
        calendar.name = var_string(record, layout.name);
        calendar.parent = record.reference(&layout.parent).map(CalendarId::new);
        calendar.resource = layout
            .resource
            .and_then(|field| record.reference(&field))
            .map(ResourceId::new);
        let base = calendar.is_base();

        let hours = record
            .var(layout.hours)
            .filter(|blob| {
                let week = &layout.week;
                let complete = blob.len() >= week.days_offset + 7 * week.day_len;
                if !complete {
                    builder.record(Diagnostic::entity(
                        EntityKind::Calendar,
                        i64::from(uid),
                        DiagnosticReason::MalformedBlob {
                            key: layout.hours.0,
                        },
                    ));
                }
                complete
            });
        match hours {
            Some(blob) => {
                calendar.days = decode_days(blob, &layout.week, dates, base);
                calendar.exceptions = decode_exceptions(blob, &layout.week, dates);
            }
            None if base => calendar.days = standard_week(),
            None => {}
        }
        builder.add_calendar(calendar)
    })
}

fn time(hour: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN)
}

/// Rule for `day` (0 is Sunday) in the standard week: weekdays work
/// 08:00-12:00 and 13:00-17:00.
fn standard_day(day: usize) -> DayRule {
    if day == 0 || day == 6 {
        return DayRule::NonWorking;
    }
    DayRule::Working(vec![
        WorkingPeriod::new(time(8), 240),
        WorkingPeriod::new(time(13), 240),
    ])
}

fn standard_week() -> [DayRule; 7] {
    std::array::from_fn(standard_day)
}

/// Working periods stored as parallel arrays of `u16` start ticks and
/// `u32` duration ticks.
fn periods(
    data: &[u8],
    count: usize,
    starts: usize,
    durations: usize,
    dates: &DateEncoding,
) -> Vec<WorkingPeriod> {
    (0..count)
        .map_while(|i| {
            let start = read_u16(data, starts + 2 * i)?;
            let length = read_u32(data, durations + 4 * i)?;
            Some(WorkingPeriod::new(
                value::time_of_day(dates, start),
                value::ticks_to_minutes(dates, length),
            ))
        })
        .collect()
}

fn decode_days(blob: &[u8], week: &WeekLayout, dates: &DateEncoding, base: bool) -> [DayRule; 7] {
    std::array::from_fn(|day| {
        let Some(block) = slice(blob, week.days_offset + day * week.day_len, week.day_len) else {
            return DayRule::Default;
        };
        let flag = read_u16(block, week.flag_offset).unwrap_or(0);
        if flag == DAY_FLAG_DEFAULT {
            return if base {
                standard_day(day)
            } else {
                DayRule::Default
            };
        }
        let count = usize::from(read_u16(block, week.count_offset).unwrap_or(0));
        if count == 0 {
            return DayRule::NonWorking;
        }
        DayRule::Working(periods(
            block,
            count.min(week.max_periods),
            week.starts_offset,
            week.durations_offset,
            dates,
        ))
    })
}

fn decode_exceptions(
    blob: &[u8],
    week: &WeekLayout,
    dates: &DateEncoding,
) -> Vec<CalendarException> {
    let Some(count) = read_u16(blob, week.exception_count_offset) else {
        return Vec::new();
    };
    let layout = &week.exception;
    let mut exceptions = Vec::new();
    let mut offset = week.exceptions_offset;
    for _ in 0..count {
        let Some(block) = slice(blob, offset, layout.len) else {
            break;
        };
        let name_len = layout.name.map_or(0, |name| {
            read_i32(block, name.len_offset)
                .and_then(|len| usize::try_from(len).ok())
                .unwrap_or(0)
        });

        let from = read_u16(block, layout.from_offset).and_then(|d| value::date(dates, d));
        let to = read_u16(block, layout.to_offset).and_then(|d| value::date(dates, d));
        if let (Some(from), Some(to)) = (from, to) {
            let count = usize::from(read_u16(block, layout.count_offset).unwrap_or(0));
            let name = layout
                .name
                .and_then(|name| slice(blob, offset + name.offset, name_len))
                .map(WideStr::new)
                .filter(|text| !text.is_empty())
                .map(|text| text.to_string());
            exceptions.push(CalendarException {
                from,
                to,
                name,
                periods: periods(
                    block,
                    count.min(week.max_periods),
                    layout.starts_offset,
                    layout.durations_offset,
                    dates,
                ),
            });
        }
        offset += layout.len + name_len.next_multiple_of(4);
    }
    exceptions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{ExceptionLayout, STANDARD_WEEK};
    use chrono::NaiveDate;

    const DATES: DateEncoding = DateEncoding {
        epoch: (1983, 12, 31),
        ticks_per_minute: 10,
    };

    /// Exception count, then 40-byte days, then unnamed 44-byte exceptions.
    const SHORT_WEEK: WeekLayout = WeekLayout {
        days_offset: 4,
        day_len: 40,
        flag_offset: 0,
        count_offset: 2,
        starts_offset: 8,
        durations_offset: 16,
        max_periods: 4,
        exception_count_offset: 0,
        exceptions_offset: 284,
        exception: ExceptionLayout {
            len: 44,
            from_offset: 0,
            to_offset: 2,
            count_offset: 6,
            starts_offset: 12,
            durations_offset: 20,
            name: None,
        },
    };

    fn put_u16(buf: &mut [u8], at: usize, v: u16) {
        buf[at..at + 2].copy_from_slice(&v.to_le_bytes());
    }

    fn put_u32(buf: &mut [u8], at: usize, v: u32) {
        buf[at..at + 4].copy_from_slice(&v.to_le_bytes());
    }

    fn week_blob() -> Vec<u8> {
        let mut blob = vec![0u8; 420];
        // Sunday inherits, Monday works 09:00 for six hours, the rest are off.
        put_u16(&mut blob, 0, 1);
        put_u16(&mut blob, 60 + 2, 1);
        put_u16(&mut blob, 60 + 8, 9 * 600);
        put_u32(&mut blob, 60 + 20, 6 * 600);
        blob
    }

    #[test]
    fn test_day_rules() {
        let days = decode_days(&week_blob(), &STANDARD_WEEK, &DATES, false);
        assert_eq!(days[0], DayRule::Default);
        assert_eq!(
            days[1],
            DayRule::Working(vec![WorkingPeriod::new(time(9), 360)])
        );
        assert_eq!(days[2], DayRule::NonWorking);

        let base = decode_days(&week_blob(), &STANDARD_WEEK, &DATES, true);
        assert_eq!(base[0], DayRule::NonWorking);
    }

    #[test]
    fn test_standard_week() {
        let week = standard_week();
        assert_eq!(week[0], DayRule::NonWorking);
        assert_eq!(week[3].working_minutes(), Some(480));
        assert_eq!(week[6], DayRule::NonWorking);
    }

    #[test]
    fn test_exceptions_follow_the_week() {
        let mut blob = week_blob();
        blob.resize(424, 0);
        put_u16(&mut blob, 420, 2);

        let name: Vec<u8> = "Holiday".encode_utf16().flat_map(u16::to_le_bytes).collect();
        let mut first = vec![0u8; 92];
        put_u16(&mut first, 0, 14_969);
        put_u16(&mut first, 2, 14_970);
        put_u32(&mut first, 88, name.len() as u32);
        blob.extend(&first);
        blob.extend(&name);
        blob.extend([0, 0]); // pad 14 bytes of name to 16

        let mut second = vec![0u8; 92];
        put_u16(&mut second, 0, 14_980);
        put_u16(&mut second, 2, 14_980);
        put_u16(&mut second, 14, 1);
        put_u16(&mut second, 20, 8 * 600);
        put_u32(&mut second, 32, 4 * 600);
        blob.extend(&second);

        let exceptions = decode_exceptions(&blob, &STANDARD_WEEK, &DATES);
        assert_eq!(exceptions.len(), 2);
        assert_eq!(exceptions[0].name.as_deref(), Some("Holiday"));
        assert_eq!(exceptions[0].from, NaiveDate::from_ymd_opt(2024, 12, 24).unwrap());
        assert!(!exceptions[0].is_working());
        assert_eq!(exceptions[1].name, None);
        assert_eq!(
            exceptions[1].periods,
            vec![WorkingPeriod::new(time(8), 240)]
        );
    }

    #[test]
    fn test_exception_past_end_is_dropped() {
        let mut blob = week_blob();
        blob.resize(424 + 50, 0);
        put_u16(&mut blob, 420, 1);
        assert!(decode_exceptions(&blob, &STANDARD_WEEK, &DATES).is_empty());
    }

    #[test]
    fn test_week_after_leading_exception_count() {
        let mut blob = vec![0u8; 284];
        put_u16(&mut blob, 0, 1);
        // Tuesday works 08:00 for eight hours.
        put_u16(&mut blob, 4 + 2 * 40 + 2, 1);
        put_u16(&mut blob, 4 + 2 * 40 + 8, 8 * 600);
        put_u32(&mut blob, 4 + 2 * 40 + 16, 8 * 600);
        put_u16(&mut blob, 4 + 6 * 40, 1);

        let mut exception = vec![0u8; 44];
        put_u16(&mut exception, 0, 14_969);
        put_u16(&mut exception, 2, 14_971);
        blob.extend(&exception);

        let days = decode_days(&blob, &SHORT_WEEK, &DATES, true);
        assert_eq!(days[0], DayRule::NonWorking);
        assert_eq!(days[1], DayRule::NonWorking);
        assert_eq!(days[2].working_minutes(), Some(480));
        assert_eq!(days[6], DayRule::NonWorking);

        let exceptions = decode_exceptions(&blob, &SHORT_WEEK, &DATES);
        assert_eq!(exceptions.len(), 1);
        assert_eq!(exceptions[0].name, None);
        assert_eq!(exceptions[0].to, NaiveDate::from_ymd_opt(2024, 12, 26).unwrap());
    }
}
