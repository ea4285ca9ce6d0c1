//! Conversions between a chi-squared statistic and its significance level.
//!
//! These wrap the chi-squared distribution from `statrs`; nothing here knows about tables.

use crate::error::{Error, Result};
use statrs::distribution::{ChiSquared, ContinuousCDF};

fn distribution(degrees_of_freedom: usize) -> Result<ChiSquared> {
    if degrees_of_freedom == 0 {
        return Err(Error::InvalidArgument(
            "degrees of freedom must be at least 1".to_string(),
        ));
    }
    ChiSquared::new(degrees_of_freedom as f64).map_err(|e| Error::InvalidArgument(e.to_string()))
}

/// Returns the probability of seeing a statistic at least as large as `chi_squared` if the null
/// hypothesis holds: `1 - CDF(chi_squared)`.
///
/// ```
/// let p = chisq::significance::p_value(3.841459, 1)?;
/// assert!((p - 0.05).abs() < 1e-6);
/// # Ok::<(), chisq::Error>(())
/// ```
pub fn p_value(chi_squared: f64, degrees_of_freedom: usize) -> Result<f64> {
    cumulative(chi_squared, degrees_of_freedom).map(|cdf| 1.0 - cdf)
}

/// The chi-squared cumulative distribution function at `chi_squared`.
pub fn cumulative(chi_squared: f64, degrees_of_freedom: usize) -> Result<f64> {
    if !chi_squared.is_finite() || chi_squared < 0.0 {
        return Err(Error::InvalidArgument(format!(
            "chi-squared value {} must be finite and non-negative",
            chi_squared
        )));
    }
    Ok(distribution(degrees_of_freedom)?.cdf(chi_squared))
}

/// Returns the critical statistic for a significance level: the value that a statistic must
/// exceed to be significant at that level.
///
/// ```
/// let critical = chisq::significance::critical_value(0.05, 1)?;
/// assert!((critical - 3.841459).abs() < 1e-3);
/// # Ok::<(), chisq::Error>(())
/// ```
pub fn critical_value(significance: f64, degrees_of_freedom: usize) -> Result<f64> {
    if !(0.0..=1.0).contains(&significance) {
        return Err(Error::InvalidArgument(format!(
            "significance {} must be between 0 and 1",
            significance
        )));
    }
    Ok(distribution(degrees_of_freedom)?.inverse_cdf(1.0 - significance))
}
