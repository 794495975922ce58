//! Wikibase timestamp parsing and formatting.
//!
//! Wikibase time values carry an ISO 8601-like string with a mandatory sign
//! and a variable-width year (`+1952-03-11T00:00:00Z`, `-13798000000-00-00T00:00:00Z`).
//! Month and day are `00` when the value is less precise than a month or day.
//! The accompanying `precision` code says which components are meaningful:
//!
//! | code | meaning          |
//! |------|------------------|
//! | 0-5  | 10^(9-code) years |
//! | 6    | millennium       |
//! | 7    | century          |
//! | 8    | decade           |
//! | 9    | year             |
//! | 10   | month            |
//! | 11   | day              |
//! | 12   | hour             |
//! | 13   | minute           |
//! | 14   | second           |

pub const PRECISION_MILLENNIUM: u8 = 6;
pub const PRECISION_CENTURY: u8 = 7;
pub const PRECISION_DECADE: u8 = 8;
pub const PRECISION_YEAR: u8 = 9;
pub const PRECISION_MONTH: u8 = 10;
pub const PRECISION_DAY: u8 = 11;
pub const PRECISION_HOUR: u8 = 12;
pub const PRECISION_MINUTE: u8 = 13;
pub const PRECISION_SECOND: u8 = 14;

/// Error type for Wikibase timestamp parsing failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeParseError {
    pub message: String,
}

impl std::fmt::Display for TimeParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TimeParseError {}

/// Components of a parsed Wikibase timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WikibaseTimestamp {
    /// Signed year; negative years are BCE.
    pub year: i64,
    /// 1-12, or 0 when unspecified.
    pub month: u8,
    /// 1-31, or 0 when unspecified.
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// UTC offset of the string's own suffix, in minutes.
    pub offset_min: i16,
}

fn invalid(what: &str, input: &str) -> TimeParseError {
    TimeParseError {
        message: format!("Invalid {} in Wikibase time: {}", what, input),
    }
}

/// Parses a timezone offset string (Z, +HH:MM, -HH:MM) and returns offset in minutes.
fn parse_timezone_offset(offset: &str) -> Result<i16, TimeParseError> {
    if offset == "Z" || offset == "z" {
        return Ok(0);
    }

    if offset.len() != 6 || offset.as_bytes()[3] != b':' {
        return Err(invalid("timezone offset", offset));
    }

    let sign = match offset.as_bytes()[0] {
        b'+' => 1i16,
        b'-' => -1i16,
        _ => return Err(invalid("timezone offset", offset)),
    };

    let hours: i16 = offset[1..3].parse().map_err(|_| invalid("timezone offset", offset))?;
    let minutes: i16 = offset[4..6].parse().map_err(|_| invalid("timezone offset", offset))?;

    if hours > 24 || (hours == 24 && minutes != 0) || minutes > 59 {
        return Err(invalid("timezone offset", offset));
    }

    Ok(sign * (hours * 60 + minutes))
}

/// Returns true if the given year is a leap year (proleptic Gregorian).
fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Returns the number of days in a given month (1-indexed).
fn days_in_month(year: i64, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn parse_two_digits(part: &str, what: &str, input: &str) -> Result<u8, TimeParseError> {
    if part.len() != 2 {
        return Err(invalid(what, input));
    }
    part.parse().map_err(|_| invalid(what, input))
}

/// Parses a Wikibase time string.
///
/// ```
/// use wikibase_claims::util::time::parse_wikibase_time;
/// let ts = parse_wikibase_time("+1952-03-11T00:00:00Z").unwrap();
/// assert_eq!((ts.year, ts.month, ts.day), (1952, 3, 11));
/// ```
pub fn parse_wikibase_time(input: &str) -> Result<WikibaseTimestamp, TimeParseError> {
    // Field offsets below are byte offsets.
    if !input.is_ascii() {
        return Err(invalid("format", input));
    }
    let sign = match input.as_bytes().first() {
        Some(b'+') => 1i64,
        Some(b'-') => -1i64,
        _ => return Err(invalid("sign", input)),
    };
    let body = &input[1..];

    let (date_part, time_part) = body
        .split_once('T')
        .ok_or_else(|| invalid("format", input))?;

    // Year has variable width, so split month and day off the right.
    let mut date_fields = date_part.rsplitn(3, '-');
    let day_str = date_fields.next().ok_or_else(|| invalid("day", input))?;
    let month_str = date_fields.next().ok_or_else(|| invalid("month", input))?;
    let year_str = date_fields.next().ok_or_else(|| invalid("year", input))?;

    if year_str.is_empty() || !year_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid("year", input));
    }
    let year: i64 = year_str.parse().map_err(|_| invalid("year", input))?;
    let year = sign * year;

    let month = parse_two_digits(month_str, "month", input)?;
    let day = parse_two_digits(day_str, "day", input)?;

    if month > 12 {
        return Err(invalid("month", input));
    }
    if day > 31 || (month != 0 && day > days_in_month(year, month)) {
        return Err(invalid("day", input));
    }

    if time_part.len() < 8
        || time_part.as_bytes()[2] != b':'
        || time_part.as_bytes()[5] != b':'
    {
        return Err(invalid("time of day", input));
    }
    let hour = parse_two_digits(&time_part[..2], "hours", input)?;
    let minute = parse_two_digits(&time_part[3..5], "minutes", input)?;
    let second = parse_two_digits(&time_part[6..8], "seconds", input)?;

    if hour > 23 {
        return Err(invalid("hours", input));
    }
    if minute > 59 {
        return Err(invalid("minutes", input));
    }
    if second > 59 {
        return Err(invalid("seconds", input));
    }

    let rest = &time_part[8..];
    let offset_min = if rest.is_empty() {
        0
    } else {
        parse_timezone_offset(rest)?
    };

    Ok(WikibaseTimestamp {
        year,
        month,
        day,
        hour,
        minute,
        second,
        offset_min,
    })
}

fn format_year(year: i64) -> String {
    if year < 0 {
        format!("{} BCE", -year)
    } else {
        format!("{:04}", year)
    }
}

fn ordinal(n: i64) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

/// Formats a timestamp showing only the components its precision covers.
///
/// Falls back to the year when the precision asks for a month or day the
/// timestamp does not carry.
pub fn format_wikibase_time(ts: &WikibaseTimestamp, precision: u8) -> String {
    let era = if ts.year < 0 { " BCE" } else { "" };
    let abs_year = ts.year.abs();

    match precision {
        PRECISION_SECOND | PRECISION_MINUTE | PRECISION_HOUR if ts.month != 0 && ts.day != 0 => {
            let date = format!("{}-{:02}-{:02}", format_year(ts.year), ts.month, ts.day);
            match precision {
                PRECISION_SECOND => format!(
                    "{} {:02}:{:02}:{:02}",
                    date, ts.hour, ts.minute, ts.second
                ),
                PRECISION_MINUTE => format!("{} {:02}:{:02}", date, ts.hour, ts.minute),
                _ => format!("{} {:02}:00", date, ts.hour),
            }
        }
        p if p >= PRECISION_DAY && ts.month != 0 && ts.day != 0 => {
            format!("{}-{:02}-{:02}", format_year(ts.year), ts.month, ts.day)
        }
        p if p >= PRECISION_MONTH && ts.month != 0 => {
            format!("{}-{:02}", format_year(ts.year), ts.month)
        }
        p if p >= PRECISION_YEAR => format_year(ts.year),
        PRECISION_DECADE => format!("{}s{}", abs_year / 10 * 10, era),
        PRECISION_CENTURY => format!("{} century{}", ordinal((abs_year - 1) / 100 + 1), era),
        PRECISION_MILLENNIUM => {
            format!("{} millennium{}", ordinal((abs_year - 1) / 1000 + 1), era)
        }
        _ => format!("{} years{}", abs_year, era),
    }
}
