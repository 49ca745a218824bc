//! Time-value-of-money helpers
//!
//! All rates are annual decimals (0.07 for 7%) and periods are whole or
//! fractional years. Zero rates and zero periods never divide by zero.

/// Rates closer to zero than this are treated as exactly zero
const RATE_EPSILON: f64 = 1e-12;

/// Grow a lump sum for `years` at `rate`
pub fn future_value(pv: f64, rate: f64, years: f64) -> f64 {
    pv * (1.0 + rate).powf(years)
}

/// Discount a future amount back `years` at `rate`
pub fn present_value(fv: f64, rate: f64, years: f64) -> f64 {
    fv / (1.0 + rate).powf(years)
}

/// Future value of a level end-of-year payment stream
pub fn future_value_of_series(pmt: f64, rate: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    if rate.abs() < RATE_EPSILON {
        return pmt * years;
    }
    pmt * ((1.0 + rate).powf(years) - 1.0) / rate
}

/// Present value of a level end-of-year annuity
pub fn pv_annuity(pmt: f64, rate: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    if rate.abs() < RATE_EPSILON {
        return pmt * years;
    }
    pmt * (1.0 - (1.0 + rate).powf(-years)) / rate
}

/// Level end-of-year payment needed to grow `pv` into `target`
///
/// Returns 0 when no contribution is needed or no time is left.
pub fn payment_to_reach(target: f64, pv: f64, rate: f64, years: f64) -> f64 {
    if years <= 0.0 {
        return 0.0;
    }
    let shortfall = target - future_value(pv, rate, years);
    if shortfall <= 0.0 {
        return 0.0;
    }
    shortfall / future_value_of_series(1.0, rate, years)
}

/// Convert a percent input (7.0) to a decimal rate (0.07)
pub fn pct(value: f64) -> f64 {
    value / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_future_and_present_value() {
        let fv = future_value(1000.0, 0.05, 10.0);
        assert_relative_eq!(fv, 1628.894626777442, epsilon = 1e-9);
        assert_relative_eq!(present_value(fv, 0.05, 10.0), 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_series_zero_rate() {
        assert_eq!(future_value_of_series(100.0, 0.0, 12.0), 1200.0);
        assert_eq!(pv_annuity(100.0, 0.0, 12.0), 1200.0);
    }

    #[test]
    fn test_pv_annuity() {
        // $100/month for 12 months at 0.5% a month
        let pv = pv_annuity(100.0, 0.005, 12.0);
        assert!((pv - 1161.89).abs() < 0.01);
    }

    #[test]
    fn test_payment_to_reach() {
        let pmt = payment_to_reach(100_000.0, 0.0, 0.06, 10.0);
        let check = future_value_of_series(pmt, 0.06, 10.0);
        assert_relative_eq!(check, 100_000.0, epsilon = 1e-6);

        // Already funded or no time left
        assert_eq!(payment_to_reach(100.0, 200.0, 0.05, 5.0), 0.0);
        assert_eq!(payment_to_reach(100_000.0, 0.0, 0.05, 0.0), 0.0);
    }
}
