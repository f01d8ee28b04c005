use serde::Serialize;

use crate::error::SipError;

/// Percentage points taken off the annual return when a plan is projected
/// in today's money.
pub const INFLATION_ADJUSTMENT_PCT: f64 = 6.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SipInputs {
    pub monthly_investment: f64,
    pub annual_return: f64,
    pub years: u32,
}

impl SipInputs {
    /// Validates raw request values. `years` arrives signed so that negative
    /// durations are reported as bad input instead of a parse failure.
    pub fn new(monthly_investment: f64, annual_return: f64, years: i64) -> Result<Self, SipError> {
        if !monthly_investment.is_finite() || monthly_investment <= 0.0 {
            return Err(SipError::InvalidInput(
                "monthly_investment must be > 0".to_string(),
            ));
        }
        if !annual_return.is_finite() {
            return Err(SipError::InvalidInput(
                "annual_return must be a finite number".to_string(),
            ));
        }
        if years <= 0 {
            return Err(SipError::InvalidInput("years must be > 0".to_string()));
        }
        let years = u32::try_from(years)
            .map_err(|_| SipError::InvalidInput("years is too large".to_string()))?;

        Ok(Self {
            monthly_investment,
            annual_return,
            years,
        })
    }

    pub fn months(&self) -> u64 {
        u64::from(self.years) * 12
    }

    /// Same plan with the return reduced by [`INFLATION_ADJUSTMENT_PCT`].
    pub fn inflation_adjusted(self) -> Self {
        Self {
            annual_return: self.annual_return - INFLATION_ADJUSTMENT_PCT,
            ..self
        }
    }

    pub fn monthly_rate(&self) -> f64 {
        self.annual_return / 12.0 / 100.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SipProjection {
    pub total_invested: f64,
    pub estimated_returns: f64,
    pub total_value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearlyGrowthPoint {
    pub year: u32,
    pub invested: f64,
    pub value: f64,
}
