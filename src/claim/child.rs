use super::fields::FieldErrors;
use super::input::{DateParts, StartingChildInput};
use chrono::NaiveDate;

pub const START_DATE: &str = "start_date";
pub const END_DATE: &str = "end_date";

/// Outcome of reading a day/month/year triple
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// Nothing entered
    Empty,
    /// Some but not all of day, month and year entered
    Incomplete,
    /// All parts entered but they are not a calendar date
    Invalid,
    Date(NaiveDate),
}

impl DateInput {
    pub fn from_parts(parts: &DateParts) -> Self {
        match (parts.year, parts.month, parts.day) {
            (None, None, None) => DateInput::Empty,
            (Some(year), Some(month), Some(day)) => NaiveDate::from_ymd_opt(year, month, day)
                .map_or(DateInput::Invalid, DateInput::Date),
            _ => DateInput::Incomplete,
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateInput::Date(date) => Some(*date),
            _ => None,
        }
    }

    fn error(&self) -> Option<&'static str> {
        match self {
            DateInput::Incomplete => Some("enter a day, month and year"),
            DateInput::Invalid => Some("enter a real date"),
            DateInput::Empty | DateInput::Date(_) => None,
        }
    }
}

/// A child whose Child Benefit started or stopped part way through the tax year.
///
/// A missing start date means the child was already eligible before the year
/// began, a missing end date that they are still eligible at its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartingChild {
    start: DateInput,
    end: DateInput,
}

impl StartingChild {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        StartingChild {
            start: start.map_or(DateInput::Empty, DateInput::Date),
            end: end.map_or(DateInput::Empty, DateInput::Date),
        }
    }

    pub fn from_input(input: &StartingChildInput) -> Self {
        StartingChild {
            start: DateInput::from_parts(&input.start),
            end: DateInput::from_parts(&input.end),
        }
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.date()
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end.date()
    }

    /// Check the entered dates, collecting every problem found
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if let Some(message) = self.start.error() {
            errors.add(START_DATE, message);
        }
        if let Some(message) = self.end.error() {
            errors.add(END_DATE, message);
        }
        if self.start == DateInput::Empty && self.end == DateInput::Empty {
            errors.add(START_DATE, "enter the date Child Benefit started or stopped");
        }
        if let (Some(start), Some(end)) = (self.start_date(), self.end_date()) {
            if start > end {
                errors.add(
                    END_DATE,
                    "the date Child Benefit stopped must be after the date it started",
                );
            }
        }
        errors
    }

    #[cfg(test)]
    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}
