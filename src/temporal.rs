//! Parsing the textual representation of temporal values, as sent by the server, into the ODBC date
//! and time structs.
//!
//! The parsers are lenient. Any non digit character is treated as a separator, which allows them
//! to read the canonical MySQL formats (`YYYY-MM-DD HH:MM:SS`) as well as packed numbers
//! (`YYYYMMDDHHMMSS`) and ODBC escape sequences (`{t 'HH:MM:SS'}`).

use atoi::atoi;

/// `SQL_DATE_STRUCT`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Date {
    pub year: i16,
    pub month: u16,
    pub day: u16,
}

/// `SQL_TIME_STRUCT`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Time {
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
}

/// `SQL_TIMESTAMP_STRUCT`
#[repr(C)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub year: i16,
    pub month: u16,
    pub day: u16,
    pub hour: u16,
    pub minute: u16,
    pub second: u16,
    /// Nanoseconds
    pub fraction: u32,
}

impl Timestamp {
    pub fn date(&self) -> Date {
        Date {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }

    pub fn time(&self) -> Time {
        Time {
            hour: self.hour,
            minute: self.minute,
            second: self.second,
        }
    }
}

impl Time {
    /// Splits an integer of the form `HHMMSS`. `None` if the hours do not fit into the struct.
    pub fn from_hhmmss(value: u64) -> Option<Self> {
        Some(Time {
            hour: u16::try_from(value / 10_000).ok()?,
            minute: (value / 100 % 100) as u16,
            second: (value % 100) as u16,
        })
    }
}

/// Parses a timestamp from up to 14 digits `YYYYMMDDHHMMSS`, ignoring everything which is not a
/// digit. Two digit years (6 or 12 digits in total) are placed in 1970 - 2069. Missing trailing
/// digits are taken to be zero.
///
/// A zero month or day is rejected, unless `zero_to_min` is set, in which case it is raised to
/// `1`.
pub fn parse_timestamp(text: &[u8], zero_to_min: bool) -> Option<Timestamp> {
    let mut digits: Vec<u8> = text
        .iter()
        .copied()
        .filter(u8::is_ascii_digit)
        .take(14)
        .collect();
    if digits.len() == 6 || digits.len() == 12 {
        let century: &[u8] = if digits[0] <= b'6' { b"20" } else { b"19" };
        digits.splice(0..0, century.iter().copied());
    }
    digits.resize(14, b'0');

    let mut month = atoi::<u16>(&digits[4..6])?;
    let mut day = atoi::<u16>(&digits[6..8])?;
    if month == 0 || day == 0 {
        if !zero_to_min {
            return None;
        }
        month = month.max(1);
        day = day.max(1);
    }

    Some(Timestamp {
        year: atoi(&digits[0..4])?,
        month,
        day,
        hour: atoi(&digits[8..10])?,
        minute: atoi(&digits[10..12])?,
        second: atoi(&digits[12..14])?,
        fraction: 0,
    })
}

/// Parses a time from the first six digits `HHMMSS` in `text`. Missing digits are taken to be zero.
pub fn parse_time(text: &[u8]) -> Time {
    let mut digits = [b'0'; 6];
    for (slot, digit) in digits
        .iter_mut()
        .zip(text.iter().copied().filter(u8::is_ascii_digit))
    {
        *slot = digit;
    }
    let two = |pos: usize| u16::from(digits[pos] - b'0') * 10 + u16::from(digits[pos + 1] - b'0');
    Time {
        hour: two(0),
        minute: two(2),
        second: two(4),
    }
}

/// Parses a date of the form `YYYY-MM-DD`, `YY-MM-DD`, `YYYYMMDD` or `YYMMDD`. The year has four
/// digits if the first run of digits is 4, 8 or at least 14 digits long (i.e. a four digit year
/// either stands alone or is packed into a date or timestamp), two otherwise.
///
/// Missing parts default to `1`. A zero month or day is rejected, unless `zero_to_min` is set, in
/// which case it is raised to `1`.
pub fn parse_date(text: &[u8], zero_to_min: bool) -> Option<Date> {
    let start = text
        .iter()
        .position(u8::is_ascii_digit)
        .unwrap_or(text.len());
    let mut rest = &text[start..];

    let first_run = digit_run(rest);
    let mut width = if first_run == 4 || first_run == 8 || first_run >= 14 {
        4
    } else {
        2
    };

    let mut fields = Vec::with_capacity(3);
    while fields.len() < 3 && !rest.is_empty() {
        let len = digit_run(&rest[..rest.len().min(width)]);
        fields.push(atoi::<u16>(&rest[..len])?);
        rest = &rest[len..];
        let separator = rest.iter().take_while(|b| !b.is_ascii_digit()).count();
        rest = &rest[separator..];
        width = 2;
    }

    let month = fields.get(1).copied().filter(|&month| month != 0);
    let day = fields.get(2).copied().filter(|&day| day != 0);
    let incomplete = fields.len() <= 1 || month.is_none() || (fields.len() > 2 && day.is_none());
    if incomplete && !zero_to_min {
        return None;
    }

    Some(Date {
        year: i16::try_from(fields.first().copied().unwrap_or(0)).ok()?,
        month: month.unwrap_or(1),
        day: day.unwrap_or(1),
    })
}

/// Interprets `text` as a time of day and returns it as the integer `HHMMSS`.
///
/// Understands `HHMMSS`, `HHMM`, `HH`, `HH:MM:SS` and, for timestamps, the time portion of
/// `YYYY-MM-DD HH:MM:SS`. `None` if a group of digits overflows.
pub fn time_as_hhmmss(text: &[u8]) -> Option<u64> {
    let groups = text
        .split(|b| !b.is_ascii_digit())
        .filter(|group| !group.is_empty())
        .map(atoi::<u64>)
        .collect::<Option<Vec<_>>>()?;
    // Groups are consumed three at a time, a timestamp leaves its time in the last three.
    let groups = groups.chunks(3).last().unwrap_or(&[]);
    TIME_MATCHERS.iter().find_map(|matcher| matcher(groups))
}

/// Tried in order. The first one to match decides the value.
const TIME_MATCHERS: [fn(&[u64]) -> Option<u64>; 2] = [packed_time, clock_time];

/// A single number, which either already is `HHMMSS` or has too few groups to be a clock time.
fn packed_time(groups: &[u64]) -> Option<u64> {
    match groups {
        [] => Some(0),
        [first, ..] if groups.len() < 3 || *first > 10_000 => Some(*first),
        _ => None,
    }
}

fn clock_time(groups: &[u64]) -> Option<u64> {
    match groups {
        [hour, minute, second] => hour
            .checked_mul(10_000)?
            .checked_add(minute.checked_mul(100)?)?
            .checked_add(*second),
        _ => None,
    }
}

fn digit_run(text: &[u8]) -> usize {
    text.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{parse_date, parse_time, parse_timestamp, time_as_hhmmss, Date, Time, Timestamp};

    #[test]
    fn canonical_timestamp() {
        let ts = parse_timestamp(b"2023-04-05 06:07:08", false).unwrap();
        assert_eq!(
            Timestamp {
                year: 2023,
                month: 4,
                day: 5,
                hour: 6,
                minute: 7,
                second: 8,
                fraction: 0
            },
            ts
        );
    }

    #[test_case(b"690101", 2069; "sixty nine is this century")]
    #[test_case(b"700101", 1970; "seventy is last century")]
    #[test_case(b"991231235959", 1999; "packed with time")]
    fn two_digit_years(text: &[u8], year: i16) {
        assert_eq!(year, parse_timestamp(text, false).unwrap().year);
    }

    #[test]
    fn date_only_timestamp_is_midnight() {
        let ts = parse_timestamp(b"20230405", false).unwrap();
        assert_eq!((2023, 4, 5), (ts.year, ts.month, ts.day));
        assert_eq!(Time::default(), ts.time());
    }

    #[test]
    fn zero_dates() {
        assert_eq!(None, parse_timestamp(b"0000-00-00 00:00:00", false));
        let ts = parse_timestamp(b"2000-00-00 10:00:00", true).unwrap();
        assert_eq!((2000, 1, 1, 10), (ts.year, ts.month, ts.day, ts.hour));
    }

    #[test]
    fn time_from_digits() {
        assert_eq!(
            Time {
                hour: 12,
                minute: 34,
                second: 56
            },
            parse_time(b"12:34:56")
        );
        assert_eq!(
            Time {
                hour: 12,
                minute: 0,
                second: 0
            },
            parse_time(b"12")
        );
    }

    #[test_case(b"2023-04-05", Date { year: 2023, month: 4, day: 5 }; "iso")]
    #[test_case(b"23-04-05", Date { year: 23, month: 4, day: 5 }; "two digit year")]
    #[test_case(b"20230405", Date { year: 2023, month: 4, day: 5 }; "packed")]
    #[test_case(b"2023-04", Date { year: 2023, month: 4, day: 1 }; "missing day")]
    #[test_case(b"{d '2023-04-05'}", Date { year: 2023, month: 4, day: 5 }; "escape sequence")]
    fn dates(text: &[u8], expected: Date) {
        assert_eq!(Some(expected), parse_date(text, false));
    }

    #[test]
    fn zero_date_raised_to_min_on_request() {
        assert_eq!(None, parse_date(b"0000-00-00", false));
        assert_eq!(
            Some(Date {
                year: 0,
                month: 1,
                day: 1
            }),
            parse_date(b"0000-00-00", true)
        );
    }

    #[test_case(b"123456", 123456; "packed")]
    #[test_case(b"12:34:56", 123456; "clock")]
    #[test_case(b"{t '01:02:03'}", 10203; "escape sequence")]
    #[test_case(b"2023-04-05 12:34:56", 123456; "timestamp")]
    #[test_case(b"1234", 1234; "hours and minutes packed")]
    #[test_case(b"", 0; "empty")]
    fn time_values(text: &[u8], expected: u64) {
        assert_eq!(Some(expected), time_as_hhmmss(text));
    }

    #[test]
    fn overflowing_clock_time_is_rejected() {
        assert_eq!(None, time_as_hhmmss(b"1:999999999999999999:1"));
    }

    #[test]
    fn hhmmss_splits_into_struct() {
        assert_eq!(
            Some(Time {
                hour: 1,
                minute: 2,
                second: 3
            }),
            Time::from_hhmmss(10203)
        );
    }
}
