use crate::claim::{parse_amount, AmountError, FormField};
use hicbc_derive::FormFields;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Gift aid donations are made net of basic rate tax and count grossed up.
const GIFT_AID_GROSS_UP: Decimal = dec!(1.25);

/// Source of a claimant's adjusted net income
pub trait IncomeAggregator {
    /// Whether enough income details were given to work out a figure
    fn can_calculate(&self) -> bool;

    fn calculate_adjusted_net_income(&self) -> Decimal;
}

/// Income components as entered, each a currency string such as "£1,200"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, FormFields)]
pub struct IncomeSources {
    /// Salary or wages before tax
    #[serde(default)]
    pub gross_income: Option<String>,
    /// Other taxable income, e.g. benefits in kind or savings interest
    #[serde(default)]
    pub other_income: Option<String>,
    /// Taxable pension income
    #[serde(default)]
    pub pensions: Option<String>,
    /// Taxable profit from property
    #[serde(default)]
    pub property: Option<String>,
    /// Self-employment and other non-employment income
    #[serde(default)]
    pub non_employment_income: Option<String>,
    /// Pension contributions taken from pay before tax
    #[serde(default)]
    pub pension_contributions_from_pay: Option<String>,
    /// Retirement annuity payments
    #[serde(default)]
    pub retirement_annuities: Option<String>,
    /// Salary sacrificed for a cycle to work scheme
    #[serde(default)]
    pub cycle_scheme: Option<String>,
    /// Salary sacrificed for childcare vouchers
    #[serde(default)]
    pub childcare: Option<String>,
    /// Pension contributions paid without tax relief at source
    #[serde(default)]
    pub outgoing_pension_contributions: Option<String>,
    /// Gift Aid donations, before grossing up
    #[serde(default)]
    pub gift_aid_donations: Option<String>,
}

/// Works out adjusted net income from [`IncomeSources`].
#[derive(Debug, Clone)]
pub struct AdjustedNetIncomeCalculator {
    gross_income: Option<Decimal>,
    additions: Vec<Decimal>,
    deductions: Vec<Decimal>,
    gift_aid_donations: Decimal,
    has_invalid: bool,
}

impl AdjustedNetIncomeCalculator {
    pub fn new(sources: &IncomeSources) -> Self {
        let mut has_invalid = false;
        let mut parse = |value: &Option<String>| -> Option<Decimal> {
            match value.as_deref().map(parse_amount) {
                None | Some(Err(AmountError::Empty)) => None,
                Some(Ok(amount)) => Some(amount),
                Some(Err(e)) => {
                    log::warn!("Ignoring income component: {}", e);
                    has_invalid = true;
                    None
                }
            }
        };

        let gross_income = parse(&sources.gross_income);
        let additions = [
            &sources.other_income,
            &sources.pensions,
            &sources.property,
            &sources.non_employment_income,
        ]
        .into_iter()
        .filter_map(&mut parse)
        .collect();
        let deductions = [
            &sources.pension_contributions_from_pay,
            &sources.retirement_annuities,
            &sources.cycle_scheme,
            &sources.childcare,
            &sources.outgoing_pension_contributions,
        ]
        .into_iter()
        .filter_map(&mut parse)
        .collect();
        let gift_aid_donations = parse(&sources.gift_aid_donations).unwrap_or_default();

        AdjustedNetIncomeCalculator {
            gross_income,
            additions,
            deductions,
            gift_aid_donations,
            has_invalid,
        }
    }

    /// Adjusted net income, or `None` if the components are too large to add up
    fn checked_total(&self) -> Option<Decimal> {
        let additions = self
            .additions
            .iter()
            .try_fold(self.gross_income.unwrap_or_default(), |total, amount| {
                total.checked_add(*amount)
            })?;
        let gift_aid = self.gift_aid_donations.checked_mul(GIFT_AID_GROSS_UP)?;
        let deductions = self
            .deductions
            .iter()
            .try_fold(gift_aid, |total, amount| total.checked_add(*amount))?;
        Some(additions.checked_sub(deductions)?.max(Decimal::ZERO))
    }
}

impl IncomeAggregator for AdjustedNetIncomeCalculator {
    fn can_calculate(&self) -> bool {
        if self.gross_income.is_none() || self.has_invalid {
            return false;
        }
        if self.checked_total().is_none() {
            log::warn!("Income components are too large to add up");
            return false;
        }
        true
    }

    fn calculate_adjusted_net_income(&self) -> Decimal {
        self.checked_total().unwrap_or_default()
    }
}
