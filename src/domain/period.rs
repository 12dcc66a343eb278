//! Reporting period resolution: a day or a calendar month.

use chrono::NaiveDate;
use thiserror::Error;

/// Raised when report query parameters name neither a valid day nor month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid report type. Use type=daily&date=YYYY-MM-DD or type=monthly&month=YYYY-MM")]
pub struct PeriodParseError;

/// Whether a report covers one day or one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodKind {
    Daily,
    Monthly,
}

impl PeriodKind {
    /// Stable string form used in report output.
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodKind::Daily => "daily",
            PeriodKind::Monthly => "monthly",
        }
    }
}

/// A fully-resolved reporting period.
///
/// Parsing resolves the half-open `[start, end)` date range up front, so
/// aggregation code never deals with calendar arithmetic or invalid input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPeriod {
    kind: PeriodKind,
    label: String,
    start: NaiveDate,
    end: NaiveDate,
}

impl ReportPeriod {
    /// Resolve a period from report query parameters.
    ///
    /// # Errors
    /// Returns [`PeriodParseError`] unless `kind` is `daily` with a valid
    /// `date` or `monthly` with a valid `month`.
    pub fn from_params(
        kind: Option<&str>,
        date: Option<&str>,
        month: Option<&str>,
    ) -> Result<Self, PeriodParseError> {
        match kind {
            Some("daily") => Self::daily(date.ok_or(PeriodParseError)?),
            Some("monthly") => Self::monthly(month.ok_or(PeriodParseError)?),
            _ => Err(PeriodParseError),
        }
    }

    /// Resolve a daily period from a `YYYY-MM-DD` string.
    ///
    /// # Errors
    /// Returns [`PeriodParseError`] for unparseable dates.
    pub fn daily(date: &str) -> Result<Self, PeriodParseError> {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| PeriodParseError)?;
        let end = day.succ_opt().ok_or(PeriodParseError)?;
        Ok(ReportPeriod {
            kind: PeriodKind::Daily,
            label: day.format("%Y-%m-%d").to_string(),
            start: day,
            end,
        })
    }

    /// Resolve a monthly period from a `YYYY-MM` string.
    ///
    /// # Errors
    /// Returns [`PeriodParseError`] for unparseable or out-of-range months.
    pub fn monthly(month: &str) -> Result<Self, PeriodParseError> {
        let (year_str, month_str) = month.split_once('-').ok_or(PeriodParseError)?;
        let year: i32 = year_str.parse().map_err(|_| PeriodParseError)?;
        let month_num: u32 = month_str.parse().map_err(|_| PeriodParseError)?;

        let start = NaiveDate::from_ymd_opt(year, month_num, 1).ok_or(PeriodParseError)?;
        let (next_year, next_month) = if month_num == 12 {
            (year + 1, 1)
        } else {
            (year, month_num + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or(PeriodParseError)?;

        Ok(ReportPeriod {
            kind: PeriodKind::Monthly,
            label: format!("{:04}-{:02}", year, month_num),
            start,
            end,
        })
    }

    /// Whether a record dated `date` belongs to this period.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }

    pub fn kind(&self) -> PeriodKind {
        self.kind
    }

    /// Human-facing period label (`2024-05-17` or `2024-05`).
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Inclusive start of the period.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Exclusive end of the period.
    pub fn end(&self) -> NaiveDate {
        self.end
    }
}
