mod engine;
mod types;

pub use engine::{MAX_SCHEDULE_YEARS, compute, yearly_growth};
pub use types::{INFLATION_ADJUSTMENT_PCT, SipInputs, SipProjection, YearlyGrowthPoint};
