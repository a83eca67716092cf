pub mod child;
pub mod fields;
pub mod input;
pub mod money;

// Flat public surface for the claim request model.
pub use child::StartingChild;
pub use fields::FieldErrors;
pub use input::{ClaimInput, FormField, PartYearClaim};
pub use money::{parse_amount, AmountError};
