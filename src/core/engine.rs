use super::types::{SipInputs, SipProjection, YearlyGrowthPoint};
use crate::error::SipError;

/// Longest plan the yearly schedule will expand, one point per year.
pub const MAX_SCHEDULE_YEARS: u32 = 100;

/// Projects an annuity-due SIP compounded monthly.
///
/// Every output is rounded to cents independently, from unrounded
/// intermediates, so `total_value - total_invested` may differ from
/// `estimated_returns` by at most one cent.
pub fn compute(inputs: &SipInputs) -> Result<SipProjection, SipError> {
    let months = inputs.months();
    let total_value = future_value(inputs.monthly_investment, inputs.monthly_rate(), months);
    let total_invested = inputs.monthly_investment * months as f64;

    Ok(SipProjection {
        total_invested: round_to_cents(total_invested)?,
        estimated_returns: round_to_cents(total_value - total_invested)?,
        total_value: round_to_cents(total_value)?,
    })
}

/// Invested amount and projected value at the end of each plan year.
///
/// Each point is the closed-form value after `12 * year` contributions, so
/// the last point agrees with [`compute`].
pub fn yearly_growth(inputs: &SipInputs) -> Result<Vec<YearlyGrowthPoint>, SipError> {
    if inputs.years > MAX_SCHEDULE_YEARS {
        return Err(SipError::InvalidInput(format!(
            "schedule is limited to {MAX_SCHEDULE_YEARS} years"
        )));
    }

    let monthly_rate = inputs.monthly_rate();
    let mut points = Vec::with_capacity(inputs.years as usize);
    for year in 1..=inputs.years {
        let months = u64::from(year) * 12;
        let value = future_value(inputs.monthly_investment, monthly_rate, months);
        points.push(YearlyGrowthPoint {
            year,
            invested: round_to_cents(inputs.monthly_investment * months as f64)?,
            value: round_to_cents(value)?,
        });
    }
    Ok(points)
}

/// `P * ((1 + r)^n - 1) / r * (1 + r)`, falling back to `P * n` at `r = 0`.
fn future_value(monthly_investment: f64, monthly_rate: f64, months: u64) -> f64 {
    let months = months as f64;
    if monthly_rate == 0.0 {
        return monthly_investment * months;
    }
    // exp_m1/ln_1p keeps (1 + r)^n - 1 accurate when r is tiny.
    let growth = (months * monthly_rate.ln_1p()).exp_m1();
    monthly_investment * (growth / monthly_rate) * (1.0 + monthly_rate)
}

/// Rounds to cents, rejecting values that are or become non-finite.
fn round_to_cents(value: f64) -> Result<f64, SipError> {
    let rounded = (value * 100.0).round() / 100.0;
    if !rounded.is_finite() {
        return Err(SipError::InvalidInput(
            "inputs produce a non-finite projection".to_string(),
        ));
    }
    Ok(rounded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const CENT: f64 = 0.01;

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn inputs(monthly_investment: f64, annual_return: f64, years: i64) -> SipInputs {
        SipInputs::new(monthly_investment, annual_return, years).expect("valid inputs")
    }

    #[test]
    fn compute_matches_annuity_due_hand_calculation() {
        let projection = compute(&inputs(10_000.0, 12.0, 10)).expect("finite projection");

        assert_eq!(projection.total_invested, 1_200_000.0);
        assert_approx_tol(projection.total_value, 2_323_390.76, CENT);
        assert_approx_tol(projection.estimated_returns, 1_123_390.76, CENT);
    }

    #[test]
    fn compute_short_plan_matches_hand_calculation() {
        let projection = compute(&inputs(2_500.0, 8.0, 3)).expect("finite projection");

        assert_eq!(projection.total_invested, 90_000.0);
        assert_approx_tol(projection.total_value, 102_014.49, CENT);
        assert_approx_tol(projection.estimated_returns, 12_014.49, CENT);
    }

    #[test]
    fn compute_zero_return_uses_limit() {
        let projection = compute(&inputs(5_000.0, 0.0, 5)).expect("finite projection");

        assert_eq!(projection.total_invested, 300_000.0);
        assert_eq!(projection.total_value, 300_000.0);
        assert_eq!(projection.estimated_returns, 0.0);
    }

    #[test]
    fn compute_tiny_return_stays_close_to_zero_return() {
        let projection = compute(&inputs(1_000.0, 1e-12, 20)).expect("finite projection");

        assert_approx_tol(projection.total_value, 240_000.0, CENT);
        assert_approx_tol(projection.estimated_returns, 0.0, CENT);
    }

    #[test]
    fn compute_negative_return_loses_value() {
        let projection = compute(&inputs(1_000.0, -5.0, 4)).expect("finite projection");

        assert!(projection.total_value < projection.total_invested);
        assert!(projection.estimated_returns < 0.0);
    }

    #[test]
    fn compute_rejects_overflowing_projection() {
        let err = compute(&inputs(1_000.0, 1_000_000.0, 1_000)).expect_err("must overflow");
        assert!(matches!(err, SipError::InvalidInput(_)));
    }

    #[test]
    fn compute_rejects_values_too_large_to_round() {
        let err = compute(&inputs(1e305, 0.0, 100)).expect_err("cents overflow f64");
        assert!(matches!(err, SipError::InvalidInput(_)));
        assert!(err.to_string().contains("non-finite"));
    }

    #[test]
    fn compute_counts_every_month_of_very_long_plans() {
        let plan = inputs(1.0, 0.0, 400_000_000);
        assert_eq!(plan.months(), 4_800_000_000);

        let projection = compute(&plan).expect("finite projection");
        assert_eq!(projection.total_invested, 4_800_000_000.0);
        assert_eq!(projection.total_value, 4_800_000_000.0);
        assert_eq!(projection.estimated_returns, 0.0);
    }

    #[test]
    fn compute_at_max_years_stays_exact_at_zero_return() {
        let plan = inputs(2.0, 0.0, i64::from(u32::MAX));
        let projection = compute(&plan).expect("finite projection");

        assert_eq!(projection.total_invested, 2.0 * f64::from(u32::MAX) * 12.0);
        assert_eq!(projection.total_value, projection.total_invested);
    }

    #[test]
    fn inputs_reject_non_positive_investment() {
        let err = SipInputs::new(-100.0, 12.0, 10).expect_err("must reject negative");
        assert!(err.to_string().contains("monthly_investment"));

        let err = SipInputs::new(0.0, 12.0, 10).expect_err("must reject zero");
        assert!(err.to_string().contains("monthly_investment"));
    }

    #[test]
    fn inputs_reject_non_positive_years() {
        let err = SipInputs::new(100.0, 12.0, 0).expect_err("must reject zero years");
        assert!(err.to_string().contains("years"));

        let err = SipInputs::new(100.0, 12.0, -3).expect_err("must reject negative years");
        assert!(err.to_string().contains("years"));
    }

    #[test]
    fn inflation_adjusted_plan_matches_lower_nominal_return() {
        let adjusted = compute(&inputs(10_000.0, 12.0, 10).inflation_adjusted())
            .expect("finite projection");
        let nominal = compute(&inputs(10_000.0, 6.0, 10)).expect("finite projection");

        assert_eq!(adjusted, nominal);
    }

    #[test]
    fn inputs_reject_non_finite_values() {
        assert!(SipInputs::new(f64::NAN, 12.0, 10).is_err());
        assert!(SipInputs::new(f64::INFINITY, 12.0, 10).is_err());
        assert!(SipInputs::new(100.0, f64::NAN, 10).is_err());
    }

    #[test]
    fn yearly_growth_has_one_point_per_year() {
        let points = yearly_growth(&inputs(10_000.0, 12.0, 10)).expect("schedule");

        assert_eq!(points.len(), 10);
        assert_eq!(points[0].year, 1);
        assert_eq!(points[0].invested, 120_000.0);
        assert_approx_tol(points[0].value, 128_093.28, CENT);
        assert_eq!(points[9].year, 10);
    }

    #[test]
    fn yearly_growth_final_point_matches_compute() {
        let plan = inputs(7_500.0, 9.5, 15);
        let projection = compute(&plan).expect("finite projection");
        let points = yearly_growth(&plan).expect("schedule");
        let last = points.last().expect("non-empty schedule");

        assert_eq!(last.invested, projection.total_invested);
        assert_approx_tol(last.value, projection.total_value, CENT);
    }

    #[test]
    fn yearly_growth_rejects_overlong_plans() {
        let err = yearly_growth(&inputs(100.0, 10.0, i64::from(MAX_SCHEDULE_YEARS) + 1))
            .expect_err("must reject overlong schedule");
        assert!(err.to_string().contains("schedule"));
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(64))]

        #[test]
        fn prop_total_value_is_invested_plus_returns(
            monthly_cents in 1u32..10_000_000,
            annual_return_bp in -2_000i32..3_000,
            years in 1i64..41
        ) {
            let plan = SipInputs::new(
                f64::from(monthly_cents) / 100.0,
                f64::from(annual_return_bp) / 100.0,
                years,
            ).expect("valid inputs");
            let projection = compute(&plan).expect("finite projection");

            let identity = projection.total_invested + projection.estimated_returns;
            prop_assert!((projection.total_value - identity).abs() <= CENT + 1e-6);
        }

        #[test]
        fn prop_zero_return_total_value_is_contributions(
            monthly_units in 1u32..1_000_000,
            years in 1i64..51
        ) {
            let monthly_investment = f64::from(monthly_units);
            let plan = SipInputs::new(monthly_investment, 0.0, years).expect("valid inputs");
            let projection = compute(&plan).expect("finite projection");

            prop_assert_eq!(projection.total_value, monthly_investment * years as f64 * 12.0);
            prop_assert_eq!(projection.estimated_returns, 0.0);
        }

        #[test]
        fn prop_schedule_invested_is_non_decreasing(
            monthly_units in 1u32..100_000,
            annual_return_bp in -1_000i32..2_500,
            years in 1i64..31
        ) {
            let plan = SipInputs::new(
                f64::from(monthly_units),
                f64::from(annual_return_bp) / 100.0,
                years,
            ).expect("valid inputs");
            let points = yearly_growth(&plan).expect("schedule");

            prop_assert_eq!(points.len() as i64, years);
            for pair in points.windows(2) {
                prop_assert!(pair[1].invested >= pair[0].invested);
            }
        }
    }
}
