//! Calendar month arithmetic for roster periods.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// Earliest year accepted for a roster period.
pub const MIN_YEAR: i32 = 1900;
/// Latest year accepted for a roster period.
pub const MAX_YEAR: i32 = 9999;

/// A validated calendar month: the unit a roster covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawPeriod", into = "RawPeriod")]
pub struct Period {
    year: i32,
    month: u8,
}

/// Errors produced when a (year, month) pair is not a usable period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeriodError {
    /// Month outside 1..=12.
    MonthOutOfRange { month: u32 },
    /// Year outside [`MIN_YEAR`]..=[`MAX_YEAR`].
    YearOutOfRange { year: i32 },
}

impl fmt::Display for PeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodError::MonthOutOfRange { month } => {
                write!(f, "month {} is outside 1..=12", month)
            }
            PeriodError::YearOutOfRange { year } => {
                write!(f, "year {} is outside {}..={}", year, MIN_YEAR, MAX_YEAR)
            }
        }
    }
}

impl std::error::Error for PeriodError {}

impl Period {
    /// Validate a (year, month) pair. Month is 1-based.
    pub fn new(year: i32, month: u32) -> Result<Self, PeriodError> {
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange { month });
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(PeriodError::YearOutOfRange { year });
        }
        Ok(Period {
            year,
            month: month as u8,
        })
    }

    /// The period containing `date`.
    pub fn of(date: Date) -> Self {
        Period {
            year: date.year(),
            month: u8::from(date.month()),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// 1-based month number.
    pub fn month(&self) -> u32 {
        u32::from(self.month)
    }

    fn calendar_month(&self) -> Month {
        // `month` is validated to 1..=12 on construction.
        Month::try_from(self.month).unwrap_or(Month::January)
    }

    /// Number of days in the month, honouring Gregorian leap years.
    pub fn days_in_month(&self) -> u8 {
        time::util::days_in_month(self.calendar_month(), self.year)
    }

    /// Every calendar day of the month, in order.
    pub fn days(&self) -> impl Iterator<Item = Date> {
        let year = self.year;
        let month = self.calendar_month();
        (1..=self.days_in_month())
            .filter_map(move |day| Date::from_calendar_date(year, month, day).ok())
    }

    /// Whether `date` falls inside this month.
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && u8::from(date.month()) == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Serialize, Deserialize)]
struct RawPeriod {
    year: i32,
    month: u32,
}

impl TryFrom<RawPeriod> for Period {
    type Error = PeriodError;

    fn try_from(raw: RawPeriod) -> Result<Self, Self::Error> {
        Period::new(raw.year, raw.month)
    }
}

impl From<Period> for RawPeriod {
    fn from(period: Period) -> Self {
        RawPeriod {
            year: period.year,
            month: period.month(),
        }
    }
}
