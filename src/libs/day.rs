//! Day-granularity timestamps.
//!
//! Completion marks are keyed by calendar day. A [`Day`] is the number of days
//! since 1970-01-01 in UTC, so the write path and the read path always agree
//! no matter which timezone the process runs in. Any `DateTime` is converted
//! to UTC first and then truncated to midnight.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MILLIS_PER_DAY: i64 = 86_400_000;
/// `NaiveDate::num_days_from_ce` of 1970-01-01.
const UNIX_EPOCH_FROM_CE: i64 = 719_163;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Day(i64);

impl Day {
    pub fn from_epoch_days(days: i64) -> Self {
        Day(days)
    }

    pub fn epoch_days(self) -> i64 {
        self.0
    }

    /// Current day in UTC.
    pub fn today() -> Self {
        Self::from_date(Utc::now().date_naive())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Day(i64::from(date.num_days_from_ce()) - UNIX_EPOCH_FROM_CE)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self::from_date)
    }

    /// Truncates a point in time to its UTC day.
    pub fn from_datetime<Tz: TimeZone>(at: &DateTime<Tz>) -> Self {
        Self::from_date(at.with_timezone(&Utc).date_naive())
    }

    /// Day containing the given epoch-millis instant.
    pub fn from_epoch_millis(millis: i64) -> Self {
        Day(millis.div_euclid(MILLIS_PER_DAY))
    }

    pub fn epoch_millis(self) -> i64 {
        self.0 * MILLIS_PER_DAY
    }

    /// Calendar date of this day. Saturates at chrono's supported range.
    pub fn date(self) -> NaiveDate {
        let from_ce = self.0 + UNIX_EPOCH_FROM_CE;
        i32::try_from(from_ce)
            .ok()
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .unwrap_or(if from_ce < 0 { NaiveDate::MIN } else { NaiveDate::MAX })
    }

    pub fn year(self) -> i32 {
        self.date().year()
    }

    pub fn month(self) -> u32 {
        self.date().month()
    }

    pub fn pred(self) -> Self {
        Day(self.0 - 1)
    }

    pub fn succ(self) -> Self {
        Day(self.0 + 1)
    }

    pub fn same_year(self, other: Day) -> bool {
        self.year() == other.year()
    }

    pub fn same_month(self, other: Day) -> bool {
        let (a, b) = (self.date(), other.date());
        a.year() == b.year() && a.month() == b.month()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.date().format("%Y-%m-%d"))
    }
}

impl FromStr for Day {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").map(Self::from_date)
    }
}

impl ToSql for Day {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Day {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i64::column_result(value).map(Day)
    }
}
