use crate::claim::child::END_DATE;
use crate::claim::{
    parse_amount, AmountError, ClaimInput, FieldErrors, PartYearClaim, StartingChild,
};
use crate::tax::accrual::{BenefitAccrualEngine, CalculationError, WeekAccrual};
use crate::tax::income::{AdjustedNetIncomeCalculator, IncomeAggregator};
use crate::tax::rates::RateProvider;
use crate::tax::uk::{DateRange, TaxYear, TaxYearTable};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Income above which child benefit starts to be clawed back
pub const CHARGE_THRESHOLD: Decimal = dec!(50000);

/// Income at which all child benefit is clawed back
pub const FULL_CHARGE_INCOME: Decimal = dec!(60000);

/// Most children a single claim can cover
pub const MAX_CHILDREN: u32 = 20;

pub const ADJUSTED_NET_INCOME: &str = "adjusted_net_income";
pub const CHILDREN_COUNT: &str = "children_count";
pub const IS_PART_YEAR_CLAIM: &str = "is_part_year_claim";
pub const TAX_YEAR: &str = "tax_year";
pub const PART_YEAR_CHILDREN_COUNT: &str = "part_year_children_count";
pub const STARTING_CHILDREN: &str = "starting_children";

/// Percentage of child benefit recovered as tax for a given adjusted net income.
///
/// 1% per full £100 over the threshold, capped at 100%. Below the threshold the
/// result is negative.
pub fn percent_tax_charge(adjusted_net_income: Decimal) -> Decimal {
    if adjusted_net_income >= FULL_CHARGE_INCOME {
        dec!(100)
    } else if (dec!(59900)..=dec!(59999)).contains(&adjusted_net_income) {
        dec!(99)
    } else {
        ((adjusted_net_income - CHARGE_THRESHOLD) / dec!(100)).floor()
    }
}

/// Charge in whole pounds on `claimed` benefit at `percent`
pub fn tax_charge(claimed: Decimal, percent: Decimal) -> Decimal {
    (claimed * percent / dec!(100)).floor()
}

/// Everything wrong with a claim: claim level errors plus one set per part year child
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClaimValidation {
    pub errors: FieldErrors,
    pub starting_children: Vec<FieldErrors>,
}

impl ClaimValidation {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty() && self.starting_children.iter().all(FieldErrors::is_empty)
    }

    /// Number of messages across the claim and all children
    pub fn error_count(&self) -> usize {
        self.errors.len()
            + self
                .starting_children
                .iter()
                .map(FieldErrors::len)
                .sum::<usize>()
    }
}

/// Result of a successful charge calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChargeEstimate {
    pub tax_year: TaxYear,
    pub child_benefit_start_date: NaiveDate,
    pub child_benefit_end_date: NaiveDate,
    pub adjusted_net_income: Decimal,
    pub percent_tax_charge: Decimal,
    pub benefits_claimed_amount: Decimal,
    pub tax_estimate: Decimal,
    pub nothing_owed: bool,
}

/// Estimates the High Income Child Benefit Charge for one claim.
///
/// Built fresh from a [`ClaimInput`] for each request.
#[derive(Debug)]
pub struct TaxChargeCalculator<'a, R> {
    rates: &'a R,
    adjusted_net_income: Result<Decimal, AmountError>,
    children_count: u32,
    part_year_children_count: u32,
    is_part_year_claim: Option<PartYearClaim>,
    year: Option<i32>,
    starting_children: Vec<StartingChild>,
}

impl<'a, R: RateProvider> TaxChargeCalculator<'a, R> {
    /// Calculator taking adjusted net income from the claim's income components when
    /// they are complete, otherwise from the entered figure.
    pub fn new(input: &ClaimInput, rates: &'a R) -> Self {
        let aggregator = AdjustedNetIncomeCalculator::new(&input.income);
        Self::with_income(input, &aggregator, rates)
    }

    pub fn with_income<A: IncomeAggregator>(
        input: &ClaimInput,
        aggregator: &A,
        rates: &'a R,
    ) -> Self {
        let adjusted_net_income = if aggregator.can_calculate() {
            Ok(aggregator.calculate_adjusted_net_income())
        } else {
            input
                .adjusted_net_income
                .as_deref()
                .map_or(Err(AmountError::Empty), parse_amount)
        };

        // Only as many children as are claimed for can have part year dates
        let starting_children = if input.is_part_year_claim() {
            let count = input
                .part_year_children_count
                .min(input.children_count)
                .min(MAX_CHILDREN);
            (0..count)
                .map(|n| {
                    input
                        .starting_child(n)
                        .map(StartingChild::from_input)
                        .unwrap_or_else(|| StartingChild::new(None, None))
                })
                .collect()
        } else {
            Vec::new()
        };

        TaxChargeCalculator {
            rates,
            adjusted_net_income,
            children_count: input.children_count,
            part_year_children_count: input.part_year_children_count,
            is_part_year_claim: input.is_part_year_claim,
            year: input.year,
            starting_children,
        }
    }

    fn is_part_year_claim(&self) -> bool {
        self.is_part_year_claim == Some(PartYearClaim::Yes)
    }

    /// The selected tax year, if it is one of the supported years
    pub fn tax_year(&self) -> Option<TaxYear> {
        self.year.map(TaxYear).filter(TaxYear::is_supported)
    }

    #[cfg(test)]
    pub fn starting_children(&self) -> &[StartingChild] {
        &self.starting_children
    }

    /// Adjusted net income, zero when none could be worked out
    pub fn adjusted_net_income(&self) -> Decimal {
        self.adjusted_net_income.as_ref().ok().copied().unwrap_or_default()
    }

    pub fn full_year_children_count(&self) -> u32 {
        if self.is_part_year_claim() {
            self.children_count
                .saturating_sub(self.part_year_children_count)
        } else {
            self.children_count
        }
    }

    pub fn validate(&self) -> ClaimValidation {
        let mut errors = FieldErrors::default();
        let mut children: Vec<FieldErrors> =
            self.starting_children.iter().map(StartingChild::validate).collect();

        match &self.adjusted_net_income {
            Ok(_) => {}
            Err(AmountError::Empty) => {
                errors.add(ADJUSTED_NET_INCOME, "enter your adjusted net income")
            }
            Err(AmountError::Invalid(_)) => errors.add(
                ADJUSTED_NET_INCOME,
                "enter your adjusted net income as an amount in pounds",
            ),
        }

        if self.is_part_year_claim.is_none() {
            errors.add(
                IS_PART_YEAR_CLAIM,
                "select whether Child Benefit started or stopped during the tax year",
            );
        }

        if self.tax_year().is_none() {
            errors.add(TAX_YEAR, "select a tax year between 2012 to 2013 and 2019 to 2020");
        }

        if self.children_count > MAX_CHILDREN {
            errors.add(
                CHILDREN_COUNT,
                format!("enter {MAX_CHILDREN} or fewer children"),
            );
        }

        if self.is_part_year_claim() && self.part_year_children_count > MAX_CHILDREN {
            errors.add(
                PART_YEAR_CHILDREN_COUNT,
                format!("enter {MAX_CHILDREN} or fewer children whose Child Benefit started or stopped"),
            );
        } else if self.is_part_year_claim() && self.part_year_children_count > self.children_count {
            errors.add(
                PART_YEAR_CHILDREN_COUNT,
                "the number of children whose Child Benefit started or stopped can't be more than the number of children you claim for",
            );
        }

        let range = self.tax_year().and_then(|year| TaxYearTable::uk().range_for(year));
        if let Some(range) = range {
            let any_valid = children.iter().any(FieldErrors::is_empty);
            if any_valid && !self.starting_children.iter().any(|c| overlaps(c, range)) {
                if let Some(first) = children.first_mut() {
                    first.add(
                        END_DATE,
                        "you didn't get Child Benefit in the tax year you selected, check the dates or choose a different tax year",
                    );
                }
            }
        }

        if self.is_part_year_claim() && children.iter().any(|c| !c.is_empty()) {
            errors.add(STARTING_CHILDREN, "check the Child Benefit dates for each child");
        }

        ClaimValidation {
            errors,
            starting_children: children,
        }
    }

    pub fn can_calculate(&self) -> bool {
        self.validate().is_valid()
    }

    pub fn percent_tax_charge(&self) -> Decimal {
        percent_tax_charge(self.adjusted_net_income())
    }

    fn accrual_engine(&self) -> Result<BenefitAccrualEngine<'_>, CalculationError> {
        let year = self.year.ok_or(CalculationError::MissingTaxYear)?;
        let tax_year = TaxYear(year);
        if !tax_year.is_supported() {
            return Err(CalculationError::UnsupportedTaxYear(year));
        }
        let rates = self.rates.rates_for(tax_year)?;
        BenefitAccrualEngine::new(
            tax_year,
            rates,
            self.full_year_children_count(),
            &self.starting_children,
        )
    }

    /// Week by week breakdown of the benefit received in the tax year
    pub fn weekly_breakdown(&self) -> Result<Vec<WeekAccrual>, CalculationError> {
        Ok(self.accrual_engine()?.weeks())
    }

    pub fn benefits_claimed_amount(&self) -> Result<Decimal, CalculationError> {
        Ok(self.accrual_engine()?.total())
    }

    /// Charge owed, in whole pounds
    pub fn tax_estimate(&self) -> Result<Decimal, CalculationError> {
        let claimed = self.benefits_claimed_amount()?;
        Ok(tax_charge(claimed, self.percent_tax_charge()))
    }

    pub fn nothing_owed(&self) -> Result<bool, CalculationError> {
        if self.adjusted_net_income() < CHARGE_THRESHOLD {
            return Ok(true);
        }
        Ok(self.tax_estimate()?.is_zero())
    }

    pub fn child_benefit_start_date(&self) -> Option<NaiveDate> {
        self.child_benefit_window().map(|window| window.start)
    }

    pub fn child_benefit_end_date(&self) -> Option<NaiveDate> {
        self.child_benefit_window().map(|window| window.end)
    }

    fn child_benefit_window(&self) -> Option<DateRange> {
        self.tax_year()?.child_benefit_window()
    }

    pub fn estimate(&self) -> Result<ChargeEstimate, CalculationError> {
        let benefits_claimed_amount = self.benefits_claimed_amount()?;
        let tax_year = self.tax_year().ok_or(CalculationError::MissingTaxYear)?;
        let (child_benefit_start_date, child_benefit_end_date) = self
            .child_benefit_start_date()
            .zip(self.child_benefit_end_date())
            .ok_or(CalculationError::UnsupportedTaxYear(tax_year.0))?;
        let percent_tax_charge = self.percent_tax_charge();
        let tax_estimate = self.tax_estimate()?;
        let adjusted_net_income = self.adjusted_net_income();
        let nothing_owed = self.nothing_owed()?;

        log::info!(
            "Tax year {}: benefit {}, income {}, charge {}%, estimate {}",
            tax_year,
            benefits_claimed_amount,
            adjusted_net_income,
            percent_tax_charge,
            tax_estimate
        );

        Ok(ChargeEstimate {
            tax_year,
            child_benefit_start_date,
            child_benefit_end_date,
            adjusted_net_income,
            percent_tax_charge,
            benefits_claimed_amount,
            tax_estimate,
            nothing_owed,
        })
    }
}

/// Whether the child got benefit at any point in `range`
fn overlaps(child: &StartingChild, range: DateRange) -> bool {
    child.start_date().is_none_or(|start| start <= range.end)
        && child.end_date().is_none_or(|end| end >= range.start)
}
