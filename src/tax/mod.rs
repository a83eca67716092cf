pub mod accrual;
pub mod charge;
pub mod income;
pub mod rates;
pub mod uk;

pub use accrual::WeekAccrual;
pub use charge::{ChargeEstimate, ClaimValidation, TaxChargeCalculator};
pub use income::IncomeSources;
pub use rates::RateTable;
