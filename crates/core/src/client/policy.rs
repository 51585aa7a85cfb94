//! Workarounds for upstream ModernGov defects.
//!
//! Several operations are documented with optional parameters that live
//! servers actually require. Everything the client sends on the caller's
//! behalf is named here so a real default can be told apart from a
//! compensation for a server bug.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Date format used by every date-scoped operation.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Committee sent by meetings-by-date when the caller names none.
///
/// `GetMeetingsByDate` rejects requests without `lCommitteeId` even though
/// the WSDL marks it optional. Committee 1 is the first committee created
/// on a new ModernGov install and survives on most deployments, so it is
/// the least surprising stand-in. Overridable with
/// `client.fallback_committee_id`.
pub const FALLBACK_COMMITTEE_ID: u32 = 1;

/// `bIsAscendingDateOrder`: servers fail when the flag is omitted.
pub const ASCENDING_DATE_ORDER: bool = true;

/// `bGlobalCalendar`: calendar events fail without an explicit flag.
pub const GLOBAL_CALENDAR: bool = true;

/// `lUserId`: anonymous calendar, required alongside `bGlobalCalendar`.
pub const ANONYMOUS_USER_ID: u32 = 0;

/// `bIsMPs`: representatives operations fail without an explicit flag.
pub const DEFAULT_IS_MPS: bool = false;

/// Render a boolean the way the .asmx GET binding expects.
pub fn flag(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// Optional caller-supplied date bounds, `YYYY-MM-DD`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

impl DateBounds {
    pub fn new(from: Option<&str>, to: Option<&str>) -> Self {
        Self {
            from: from.map(String::from),
            to: to.map(String::from),
        }
    }
}

/// A concrete date range sent upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// A caller-supplied date that is not `YYYY-MM-DD`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDate {
    pub parameter: &'static str,
    pub value: String,
}

impl DateRange {
    /// `YYYY-01-01` to `YYYY-12-31`.
    ///
    /// Date-scoped operations return nothing, or fail, when either bound is
    /// missing, so omitted bounds fall back to the current calendar year.
    pub fn calendar_year(year: i32) -> Self {
        // Jan 1 and Dec 31 exist in every year chrono can represent
        let from = NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN);
        let to = NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX);
        Self { from, to }
    }

    /// Fill omitted bounds from the calendar year containing `today`.
    pub fn resolve(bounds: &DateBounds, today: NaiveDate) -> Result<Self, InvalidDate> {
        let year = Self::calendar_year(today.year());
        let from = match non_blank(&bounds.from) {
            Some(value) => parse_date("sFromDate", value)?,
            None => year.from,
        };
        let to = match non_blank(&bounds.to) {
            Some(value) => parse_date("sToDate", value)?,
            None => year.to,
        };
        Ok(Self { from, to })
    }

    pub fn from_param(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date(parameter: &'static str, value: &str) -> Result<NaiveDate, InvalidDate> {
    let invalid = || InvalidDate {
        parameter,
        value: value.to_string(),
    };
    // chrono accepts unpadded fields, the upstream does not
    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}
