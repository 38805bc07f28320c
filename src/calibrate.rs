//! Post-hoc adjustment of a raw P(costs).
//!
//! Small p-values follow a fitted quadratic; larger ones are looked up in
//! an empirical reference sample, since one curve does not fit both tails.

use crate::SptError;

/// Boundary between the fitted and the empirical regime.
pub const FIT_LIMIT: f64 = 0.1;

const LINEAR: f64 = 2.59;
const QUADRATIC: f64 = 5.89;

/// Calibrate `p` against `reference`.
///
/// The reference sample is only consulted when `p > FIT_LIMIT`; it must
/// then be non-empty.
pub fn calibrate(p: f64, reference: &[f64]) -> Result<f64, SptError> {
    if !(0.0..=1.0).contains(&p) {
        return Err(SptError::Calibration(format!("p = {p} is not a probability")));
    }
    if p > FIT_LIMIT {
        empirical_fraction(p, reference)
    } else {
        Ok(quadratic_fit(p))
    }
}

/// Fixed correction for the low tail.
pub fn quadratic_fit(p: f64) -> f64 {
    LINEAR * p - QUADRATIC * p * p
}

/// Fraction of `reference` at or below `p`.
pub fn empirical_fraction(p: f64, reference: &[f64]) -> Result<f64, SptError> {
    if reference.is_empty() {
        return Err(SptError::Calibration("reference sample is empty".into()));
    }
    let at_or_below = reference.iter().filter(|&&x| x <= p).count();
    Ok(at_or_below as f64 / reference.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_tail_uses_quadratic() {
        let p = calibrate(0.05, &[]).unwrap();
        assert!((p - (2.59 * 0.05 - 5.89 * 0.0025)).abs() < 1e-12);
        assert_eq!(calibrate(0.0, &[]).unwrap(), 0.0);
    }

    #[test]
    fn boundary_is_fitted() {
        let p = calibrate(FIT_LIMIT, &[]).unwrap();
        assert!((p - 0.2001).abs() < 1e-9);
    }

    #[test]
    fn high_tail_uses_reference() {
        let reference = [0.05, 0.2, 0.3, 0.5, 0.9];
        assert_eq!(calibrate(0.3, &reference).unwrap(), 0.6);
        assert_eq!(calibrate(1.0, &reference).unwrap(), 1.0);
    }

    #[test]
    fn high_tail_needs_reference() {
        assert!(matches!(calibrate(0.5, &[]), Err(SptError::Calibration(_))));
        assert!(calibrate(1.5, &[0.1]).is_err());
    }
}
