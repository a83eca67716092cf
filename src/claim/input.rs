use crate::tax::income::IncomeSources;
use hicbc_derive::FormFields;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Description of one claim input field, generated by `#[derive(FormFields)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}

/// Answer to "did Child Benefit start or stop during the tax year?"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PartYearClaim {
    Yes,
    No,
}

/// Raw claim request, as submitted by the calculator form
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, FormFields)]
pub struct ClaimInput {
    /// Adjusted net income as entered (e.g. "£55,000"), used when income components are not given
    #[serde(default)]
    pub adjusted_net_income: Option<String>,
    /// Income components for working out adjusted net income
    #[serde(default)]
    pub income: IncomeSources,
    /// Number of children Child Benefit is claimed for
    #[serde(default = "default_children_count")]
    pub children_count: u32,
    /// How many of those children started or stopped getting Child Benefit during the year
    #[serde(default)]
    pub part_year_children_count: u32,
    /// Whether Child Benefit started or stopped during the year: yes or no
    #[serde(default)]
    pub is_part_year_claim: Option<PartYearClaim>,
    /// Tax year by the calendar year it starts in (2012 to 2019)
    #[serde(default)]
    pub year: Option<i32>,
    /// Child Benefit dates per part year child, keyed "0", "1", ...
    #[serde(default)]
    pub starting_children: BTreeMap<String, StartingChildInput>,
}

fn default_children_count() -> u32 {
    1
}

impl Default for ClaimInput {
    fn default() -> Self {
        ClaimInput {
            adjusted_net_income: None,
            income: IncomeSources::default(),
            children_count: default_children_count(),
            part_year_children_count: 0,
            is_part_year_claim: None,
            year: None,
            starting_children: BTreeMap::new(),
        }
    }
}

impl ClaimInput {
    pub fn is_part_year_claim(&self) -> bool {
        self.is_part_year_claim == Some(PartYearClaim::Yes)
    }

    /// Dates entered for the part year child at `index`
    pub fn starting_child(&self, index: u32) -> Option<&StartingChildInput> {
        self.starting_children.get(&index.to_string())
    }
}

/// Dates Child Benefit started and stopped for one child
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StartingChildInput {
    #[serde(default)]
    pub start: DateParts,
    #[serde(default)]
    pub end: DateParts,
}

/// A date entered as separate day, month and year boxes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct DateParts {
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub month: Option<u32>,
    #[serde(default)]
    pub day: Option<u32>,
}

impl DateParts {
    #[cfg(test)]
    pub fn ymd(year: i32, month: u32, day: u32) -> Self {
        DateParts {
            year: Some(year),
            month: Some(month),
            day: Some(day),
        }
    }
}
