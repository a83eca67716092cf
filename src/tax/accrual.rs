use crate::claim::StartingChild;
use crate::tax::rates::{ChildBenefitRates, RateError};
use crate::tax::uk::{DateRange, TaxYear};
use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("unsupported tax year: {0}")]
    UnsupportedTaxYear(i32),
    #[error("tax year not selected")]
    MissingTaxYear,
    #[error(transparent)]
    Rates(#[from] RateError),
}

/// The Monday a benefit week is anchored to: `date` itself if it is a Monday,
/// otherwise the following Monday.
pub fn monday_on_or_after(date: NaiveDate) -> NaiveDate {
    let days = (7 - date.weekday().num_days_from_monday()) % 7;
    date + Duration::days(i64::from(days))
}

/// Benefit accrued for one week of the tax year
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekAccrual {
    pub anchor: NaiveDate,
    pub children: u32,
    pub amount: Decimal,
}

/// Whether `child` counts towards the benefit week anchored at `anchor`.
///
/// A claim starting inside the year's start blackout never counts, whatever its end date.
pub fn is_eligible(child: &StartingChild, tax_year: TaxYear, anchor: NaiveDate) -> bool {
    if let (Some(start), Some(blackout)) = (child.start_date(), tax_year.start_blackout()) {
        if blackout.contains(start) {
            return false;
        }
    }
    let started = child
        .start_date()
        .is_none_or(|start| monday_on_or_after(start) <= anchor);
    let not_stopped = child.end_date().is_none_or(|end| end >= anchor);
    started && not_stopped
}

/// Adds up the child benefit received week by week across a tax year
#[derive(Debug)]
pub struct BenefitAccrualEngine<'a> {
    tax_year: TaxYear,
    window: DateRange,
    rates: ChildBenefitRates,
    full_year_children: u32,
    starting_children: &'a [StartingChild],
}

impl<'a> BenefitAccrualEngine<'a> {
    pub fn new(
        tax_year: TaxYear,
        rates: ChildBenefitRates,
        full_year_children: u32,
        starting_children: &'a [StartingChild],
    ) -> Result<Self, CalculationError> {
        let window = tax_year
            .child_benefit_window()
            .ok_or(CalculationError::UnsupportedTaxYear(tax_year.0))?;
        Ok(BenefitAccrualEngine {
            tax_year,
            window,
            rates,
            full_year_children,
            starting_children,
        })
    }

    /// Anchors of each 7 day slice of the window, excluding its final day
    fn anchors(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.window.end;
        std::iter::successors(Some(self.window.start), |slice| {
            Some(*slice + Duration::days(7))
        })
        .take_while(move |slice| *slice < end)
        .map(monday_on_or_after)
    }

    /// Children eligible in the week anchored at `anchor`
    pub fn eligible_children(&self, anchor: NaiveDate) -> u32 {
        let starting = self
            .starting_children
            .iter()
            .filter(|child| is_eligible(child, self.tax_year, anchor))
            .count();
        self.full_year_children + starting as u32
    }

    pub fn weeks(&self) -> Vec<WeekAccrual> {
        self.anchors()
            .map(|anchor| {
                let children = self.eligible_children(anchor);
                let amount = self.rates.weekly_amount(children);
                log::debug!("Week {}: {} children, {}", anchor, children, amount);
                WeekAccrual {
                    anchor,
                    children,
                    amount,
                }
            })
            .collect()
    }

    /// Total benefit for the year, to the penny
    pub fn total(&self) -> Decimal {
        self.weeks()
            .iter()
            .map(|week| week.amount)
            .sum::<Decimal>()
            .round_dp(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::rates::{RateProvider, RateTable};
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rates(year: i32) -> ChildBenefitRates {
        RateTable::default().rates_for(TaxYear(year)).unwrap()
    }

    #[test]
    fn monday_is_unchanged() {
        assert_eq!(monday_on_or_after(date(2014, 4, 7)), date(2014, 4, 7));
    }

    #[test]
    fn other_days_move_to_next_monday() {
        // Sunday
        assert_eq!(monday_on_or_after(date(2014, 4, 6)), date(2014, 4, 7));
        // Tuesday
        assert_eq!(monday_on_or_after(date(2014, 4, 8)), date(2014, 4, 14));
        // Saturday across a month end
        assert_eq!(monday_on_or_after(date(2015, 1, 31)), date(2015, 2, 2));
    }

    #[test]
    fn monday_on_or_after_is_always_a_monday_within_a_week() {
        let start = date(2012, 1, 1);
        for offset in 0..800 {
            let d = start + Duration::days(offset);
            let monday = monday_on_or_after(d);
            assert_eq!(monday.weekday(), chrono::Weekday::Mon);
            assert!(monday >= d);
            assert!((monday - d).num_days() < 7);
        }
    }

    #[test]
    fn full_year_single_child_2014() {
        let engine = BenefitAccrualEngine::new(TaxYear(2014), rates(2014), 1, &[]).unwrap();
        let weeks = engine.weeks();
        assert_eq!(weeks.len(), 52);
        assert_eq!(weeks[0].anchor, date(2014, 4, 7));
        assert_eq!(engine.total(), dec!(1066.00));
    }

    #[test]
    fn leap_year_has_53_weeks() {
        let engine = BenefitAccrualEngine::new(TaxYear(2015), rates(2015), 1, &[]).unwrap();
        assert_eq!(engine.weeks().len(), 53);
        assert_eq!(engine.total(), dec!(1097.10));
    }

    #[test]
    fn tax_year_2012_accrues_from_commencement() {
        let engine = BenefitAccrualEngine::new(TaxYear(2012), rates(2012), 1, &[]).unwrap();
        let weeks = engine.weeks();
        assert_eq!(weeks.len(), 13);
        assert_eq!(weeks[0].anchor, date(2013, 1, 7));
        assert_eq!(engine.total(), dec!(263.90));
    }

    #[test]
    fn additional_full_year_child_adds_additional_rate_every_week() {
        let one = BenefitAccrualEngine::new(TaxYear(2016), rates(2016), 1, &[]).unwrap();
        let two = BenefitAccrualEngine::new(TaxYear(2016), rates(2016), 2, &[]).unwrap();
        let weeks = Decimal::from(one.weeks().len() as u32);
        assert_eq!(two.total() - one.total(), weeks * dec!(13.70));
    }

    #[test]
    fn no_children_accrue_nothing() {
        let engine = BenefitAccrualEngine::new(TaxYear(2014), rates(2014), 0, &[]).unwrap();
        assert!(engine.weeks().iter().all(|w| w.children == 0));
        assert_eq!(engine.total(), Decimal::ZERO);
    }

    #[test]
    fn starting_child_counts_from_the_monday_after_start() {
        // 2014-06-04 is a Wednesday, so benefit counts from Monday 9 June
        let children = [StartingChild::new(Some(date(2014, 6, 4)), None)];
        let engine = BenefitAccrualEngine::new(TaxYear(2014), rates(2014), 0, &children).unwrap();
        let weeks = engine.weeks();
        let first = weeks.iter().find(|w| w.children == 1).unwrap();
        assert_eq!(first.anchor, date(2014, 6, 9));
        assert_eq!(engine.eligible_children(date(2014, 6, 2)), 0);
        assert_eq!(engine.eligible_children(date(2014, 6, 9)), 1);
    }

    #[test]
    fn stopping_child_counts_up_to_end_date() {
        let children = [StartingChild::new(None, Some(date(2014, 6, 9)))];
        let engine = BenefitAccrualEngine::new(TaxYear(2014), rates(2014), 0, &children).unwrap();
        assert_eq!(engine.eligible_children(date(2014, 6, 9)), 1);
        assert_eq!(engine.eligible_children(date(2014, 6, 16)), 0);
        // 7 April to 9 June inclusive
        let counted = engine.weeks().iter().filter(|w| w.children == 1).count();
        assert_eq!(counted, 10);
        assert_eq!(engine.total(), dec!(205.00));
    }

    #[test]
    fn mixes_full_year_and_starting_children() {
        let children = [StartingChild::new(Some(date(2014, 10, 6)), None)];
        let engine = BenefitAccrualEngine::new(TaxYear(2014), rates(2014), 1, &children).unwrap();
        assert_eq!(engine.eligible_children(date(2014, 9, 29)), 1);
        assert_eq!(engine.eligible_children(date(2014, 10, 6)), 2);
        let week = engine
            .weeks()
            .into_iter()
            .find(|w| w.anchor == date(2014, 10, 6))
            .unwrap();
        assert_eq!(week.amount, dec!(34.05));
    }

    #[test]
    fn start_in_2012_blackout_never_counts() {
        let child = StartingChild::new(Some(date(2013, 4, 3)), None);
        let children = [child];
        let engine = BenefitAccrualEngine::new(TaxYear(2012), rates(2012), 0, &children).unwrap();
        assert!(engine.weeks().iter().all(|w| w.children == 0));
        assert!(!is_eligible(&child, TaxYear(2012), date(2013, 4, 8)));
        assert_eq!(engine.total(), Decimal::ZERO);
    }

    #[test]
    fn start_in_year_end_blackout_never_counts() {
        let child = StartingChild::new(Some(date(2015, 3, 31)), Some(date(2015, 6, 1)));
        assert!(!is_eligible(&child, TaxYear(2014), date(2015, 4, 6)));
        let child = StartingChild::new(Some(date(2015, 3, 30)), None);
        assert!(is_eligible(&child, TaxYear(2014), date(2015, 3, 30)));
    }

    #[test]
    fn weeks_are_repeatable() {
        let children = [StartingChild::new(Some(date(2017, 8, 1)), Some(date(2018, 1, 1)))];
        let engine = BenefitAccrualEngine::new(TaxYear(2017), rates(2017), 1, &children).unwrap();
        assert_eq!(engine.weeks(), engine.weeks());
        assert_eq!(engine.total(), engine.total());
    }

    #[test]
    fn unsupported_year_is_an_error() {
        let err = BenefitAccrualEngine::new(TaxYear(2020), rates(2019), 1, &[]).unwrap_err();
        assert_eq!(err, CalculationError::UnsupportedTaxYear(2020));
    }
}
