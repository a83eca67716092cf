use crate::tax::uk::TaxYear;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RateError {
    #[error("no child benefit rates for tax year {0}")]
    MissingRates(TaxYear),
    #[error("rates given for unsupported tax year {0}")]
    UnsupportedYear(TaxYear),
    #[error("negative child benefit rate for tax year {0}")]
    NegativeRate(TaxYear),
    #[error("invalid rate table: {0}")]
    InvalidTable(String),
}

/// Weekly child benefit rates for one tax year
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildBenefitRates {
    pub first_child: Decimal,
    pub additional_child: Decimal,
}

impl ChildBenefitRates {
    /// Benefit paid for one week with `children` eligible children
    pub fn weekly_amount(&self, children: u32) -> Decimal {
        match children {
            0 => Decimal::ZERO,
            n => self.first_child + Decimal::from(n - 1) * self.additional_child,
        }
    }
}

/// Source of child benefit rates by tax year.
pub trait RateProvider {
    fn rates_for(&self, year: TaxYear) -> Result<ChildBenefitRates, RateError>;
}

/// Row of a rates CSV file, rates kept as text so they parse exactly
#[derive(Debug, Deserialize)]
struct RateRecord {
    year: i32,
    first_child_rate: String,
    additional_child_rate: String,
}

fn parse_rate(year: TaxYear, rate: &str) -> Result<Decimal, RateError> {
    let rate = Decimal::from_str(rate.trim())
        .map_err(|e| RateError::InvalidTable(format!("{year}: {e}")))?;
    if rate.is_sign_negative() {
        return Err(RateError::NegativeRate(year));
    }
    Ok(rate)
}

/// Rate table keyed by tax year
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateTable {
    rates: BTreeMap<TaxYear, ChildBenefitRates>,
}

impl Default for RateTable {
    /// Published weekly rates for 2012/13 to 2019/20
    fn default() -> Self {
        let frozen = ChildBenefitRates {
            first_child: dec!(20.70),
            additional_child: dec!(13.70),
        };
        let rates = [
            (2012, dec!(20.30), dec!(13.40)),
            (2013, dec!(20.30), dec!(13.40)),
            (2014, dec!(20.50), dec!(13.55)),
        ]
        .into_iter()
        .map(|(year, first_child, additional_child)| {
            (
                TaxYear(year),
                ChildBenefitRates {
                    first_child,
                    additional_child,
                },
            )
        })
        .chain((2015..=2019).map(|year| (TaxYear(year), frozen)))
        .collect();
        RateTable { rates }
    }
}

impl RateTable {
    /// Read rates from CSV with `year,first_child_rate,additional_child_rate` columns.
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, RateError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut rates = BTreeMap::new();
        for result in rdr.deserialize() {
            let record: RateRecord =
                result.map_err(|e| RateError::InvalidTable(e.to_string()))?;
            let year = TaxYear(record.year);
            if !year.is_supported() {
                return Err(RateError::UnsupportedYear(year));
            }
            let rates_for_year = ChildBenefitRates {
                first_child: parse_rate(year, &record.first_child_rate)?,
                additional_child: parse_rate(year, &record.additional_child_rate)?,
            };
            if rates.insert(year, rates_for_year).is_some() {
                return Err(RateError::InvalidTable(format!("duplicate tax year {year}")));
            }
        }
        log::info!("Read {} rate table rows", rates.len());
        Ok(RateTable { rates })
    }

    pub fn iter(&self) -> impl Iterator<Item = (TaxYear, ChildBenefitRates)> + '_ {
        self.rates.iter().map(|(year, rates)| (*year, *rates))
    }
}

impl RateProvider for RateTable {
    fn rates_for(&self, year: TaxYear) -> Result<ChildBenefitRates, RateError> {
        let rates = self
            .rates
            .get(&year)
            .copied()
            .ok_or(RateError::MissingRates(year))?;
        log::debug!(
            "Rates {}: first child {}, additional child {}",
            year,
            rates.first_child,
            rates.additional_child
        );
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_covers_supported_years() {
        let table = RateTable::default();
        for year in crate::tax::uk::SUPPORTED_YEARS {
            assert!(table.rates_for(TaxYear(year)).is_ok(), "{year}");
        }
        assert_eq!(
            table.rates_for(TaxYear(2020)),
            Err(RateError::MissingRates(TaxYear(2020)))
        );
    }

    #[test]
    fn default_rates_2014() {
        let rates = RateTable::default().rates_for(TaxYear(2014)).unwrap();
        assert_eq!(rates.first_child, dec!(20.50));
        assert_eq!(rates.additional_child, dec!(13.55));
    }

    #[test]
    fn weekly_amount_by_children() {
        let rates = ChildBenefitRates {
            first_child: dec!(20.70),
            additional_child: dec!(13.70),
        };
        assert_eq!(rates.weekly_amount(0), dec!(0));
        assert_eq!(rates.weekly_amount(1), dec!(20.70));
        assert_eq!(rates.weekly_amount(3), dec!(48.10));
    }

    #[test]
    fn read_csv_rates() {
        let data = "year,first_child_rate,additional_child_rate\n2014,20.50,13.55\n2015,21.00,14.00\n";
        let table = RateTable::read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.iter().count(), 2);
        let rates = table.rates_for(TaxYear(2015)).unwrap();
        assert_eq!(rates.first_child, dec!(21.00));
        assert_eq!(rates.first_child.scale(), 2);
        assert!(table.rates_for(TaxYear(2016)).is_err());
    }

    #[test]
    fn read_csv_rejects_unsupported_year() {
        let data = "year,first_child_rate,additional_child_rate\n2030,20.50,13.55\n";
        assert_eq!(
            RateTable::read_csv(data.as_bytes()),
            Err(RateError::UnsupportedYear(TaxYear(2030)))
        );
    }

    #[test]
    fn read_csv_rejects_duplicates_and_garbage() {
        let dup = "year,first_child_rate,additional_child_rate\n2014,1,1\n2014,2,2\n";
        assert!(matches!(
            RateTable::read_csv(dup.as_bytes()),
            Err(RateError::InvalidTable(_))
        ));
        let bad = "year,first_child_rate,additional_child_rate\n2014,abc,1\n";
        assert!(matches!(
            RateTable::read_csv(bad.as_bytes()),
            Err(RateError::InvalidTable(_))
        ));
        let negative = "year,first_child_rate,additional_child_rate\n2014,-1,1\n";
        assert_eq!(
            RateTable::read_csv(negative.as_bytes()),
            Err(RateError::NegativeRate(TaxYear(2014)))
        );
    }
}
