use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::LazyLock;

/// Tax years for which the High Income Child Benefit Charge can be estimated.
pub const SUPPORTED_YEARS: RangeInclusive<i32> = 2012..=2019;

/// UK Tax Year (runs 6 April to 5 April)
/// The year value represents the start year (e.g., 2014 = 2014/15 tax year)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TaxYear(pub i32);

impl TaxYear {
    pub fn is_supported(&self) -> bool {
        SUPPORTED_YEARS.contains(&self.0)
    }

    /// Display as "2014/15" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.0, (self.0 + 1) % 100)
    }

    /// Date range used for accruing child benefit in this year.
    ///
    /// The charge came into force on 7 January 2013, so 2012/13 only accrues
    /// from that date. Every other year uses its full table range.
    pub fn child_benefit_window(&self) -> Option<DateRange> {
        let range = TaxYearTable::uk().range_for(*self)?;
        if self.0 == 2012 {
            Some(DateRange::new(NaiveDate::from_ymd_opt(2013, 1, 7)?, range.end))
        } else {
            Some(range)
        }
    }

    /// Window in which a newly started claim does not count towards this year.
    pub fn start_blackout(&self) -> Option<DateRange> {
        if self.0 == 2012 {
            Some(DateRange::new(
                NaiveDate::from_ymd_opt(2013, 4, 1)?,
                NaiveDate::from_ymd_opt(2013, 4, 5)?,
            ))
        } else {
            Some(DateRange::new(
                NaiveDate::from_ymd_opt(self.0 + 1, 3, 31)?,
                NaiveDate::from_ymd_opt(self.0 + 1, 4, 5)?,
            ))
        }
    }
}

impl std::fmt::Display for TaxYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Inclusive range of calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of days covered, counting both ends
    #[cfg(test)]
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format("%-d %B %Y"),
            self.end.format("%-d %B %Y")
        )
    }
}

/// Date ranges of the supported UK tax years.
#[derive(Debug)]
pub struct TaxYearTable {
    years: BTreeMap<TaxYear, DateRange>,
}

static UK_TAX_YEARS: LazyLock<TaxYearTable> = LazyLock::new(|| {
    let years = SUPPORTED_YEARS
        .filter_map(|year| {
            let start = NaiveDate::from_ymd_opt(year, 4, 6)?;
            let end = NaiveDate::from_ymd_opt(year + 1, 4, 5)?;
            Some((TaxYear(year), DateRange::new(start, end)))
        })
        .collect();
    TaxYearTable { years }
});

impl TaxYearTable {
    pub fn uk() -> &'static TaxYearTable {
        &UK_TAX_YEARS
    }

    pub fn range_for(&self, year: TaxYear) -> Option<DateRange> {
        self.years.get(&year).copied()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = (TaxYear, DateRange)> + '_ {
        self.years.iter().map(|(year, range)| (*year, *range))
    }
}
