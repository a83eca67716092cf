use rust_decimal::Decimal;
use std::str::FromStr;

/// Characters a claimant may type around an amount, e.g. "£55,000"
const IGNORED_CHARS: &[char] = &['£', ',', ' ', '-'];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AmountError {
    #[error("no amount given")]
    Empty,
    #[error("invalid amount: {0}")]
    Invalid(String),
}

/// Parse a currency amount as typed into a form.
///
/// Pound signs, commas, spaces and hyphens are stripped, so the result is never negative.
pub fn parse_amount(input: &str) -> Result<Decimal, AmountError> {
    let cleaned: String = input.chars().filter(|c| !IGNORED_CHARS.contains(c)).collect();
    if cleaned.is_empty() {
        return Err(AmountError::Empty);
    }
    Decimal::from_str(&cleaned).map_err(|_| AmountError::Invalid(input.to_string()))
}
