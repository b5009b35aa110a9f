use crate::error::AocError;
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use log::debug;
use std::fmt;

/// First year the puzzle inputs are fetched from.
pub const FIRST_YEAR: i32 = 2020;
pub const LAST_DAY: u32 = 25;
const DECEMBER: u32 = 12;
/// Puzzles unlock at midnight UTC-5; a fixed offset, no DST.
const PUZZLE_OFFSET_SECS: i32 = 5 * 3600;

/// Resolved (year, day) key of a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EffectiveDate {
    year: i32,
    day: u32,
}

impl EffectiveDate {
    pub fn new(year: i32, day: u32) -> Result<Self, AocError> {
        if year < FIRST_YEAR || !(1..=LAST_DAY).contains(&day) {
            return Err(AocError::InvalidDateRange {
                year: Some(year),
                day: Some(day.into()),
            });
        }
        Ok(Self { year, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl fmt::Display for EffectiveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "year {} day {}", self.year, self.day)
    }
}

/// Resolve the puzzle key relative to the current time.
pub fn resolve_date(year: Option<i32>, day: Option<u32>) -> Result<EffectiveDate, AocError> {
    resolve_date_at(year, day, Utc::now())
}

/// Resolve the puzzle key; `None` for both means "today" in UTC-5.
///
/// Today only qualifies between December 1st and 25th. Explicit values are
/// validated, never clamped, and a single unset value is rejected.
pub fn resolve_date_at(
    year: Option<i32>,
    day: Option<u32>,
    now: DateTime<Utc>,
) -> Result<EffectiveDate, AocError> {
    let date = match (year, day) {
        (None, None) => {
            let offset = FixedOffset::west_opt(PUZZLE_OFFSET_SECS)
                .ok_or(AocError::InvalidParameter("puzzle offset out of range"))?;
            let today = now.with_timezone(&offset).date_naive();
            if today.month() != DECEMBER || today.day() > LAST_DAY {
                return Err(AocError::OutOfSeason { today });
            }
            EffectiveDate::new(today.year(), today.day())?
        }
        (Some(year), Some(day)) => EffectiveDate::new(year, day)?,
        (year, day) => {
            return Err(AocError::InvalidDateRange {
                year,
                day: day.map(i64::from),
            });
        }
    };
    debug!("Configured to run as year: {} and day: {}", date.year, date.day);
    Ok(date)
}
