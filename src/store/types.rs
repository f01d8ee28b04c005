use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::{SipInputs, SipProjection};

/// A calculation as persisted in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CalculationRecord {
    pub id: i64,
    pub monthly_investment: f64,
    pub annual_return: f64,
    pub years: u32,
    pub total_invested: f64,
    pub estimated_returns: f64,
    pub total_value: f64,
    pub created_at: DateTime<Utc>,
}

/// Record fields before the store assigns an id and timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewCalculation {
    pub monthly_investment: f64,
    pub annual_return: f64,
    pub years: u32,
    pub total_invested: f64,
    pub estimated_returns: f64,
    pub total_value: f64,
}

impl NewCalculation {
    pub fn from_projection(inputs: &SipInputs, projection: &SipProjection) -> Self {
        Self {
            monthly_investment: inputs.monthly_investment,
            annual_return: inputs.annual_return,
            years: inputs.years,
            total_invested: projection.total_invested,
            estimated_returns: projection.estimated_returns,
            total_value: projection.total_value,
        }
    }
}
