pub mod broadcast;
pub mod sst;
pub mod studentt;

pub use sst::{SkewedStudentT, SstKernel, Validation};

use crate::error::Result;
use ndarray::{ArrayBase, ArrayD, Data, Dimension};

/// A trait providing common distribution helper methods.
///
/// This trait provides scipy-like methods for distributions whose parameters
/// are n-dimensional arrays of independent elements:
/// - `mean()`, `std()`, `variance()` - moments
/// - `pdf()`, `logpdf()` - probability density functions
/// - `cdf()`, `sf()` - cumulative distribution and survival functions
/// - `ppf()` - percent point function (inverse CDF / quantile function)
/// - `sample()` - random sampling
/// - `interval()` - central intervals
///
/// Evaluation inputs are broadcast against the parameter shape; the output has
/// the broadcast shape. Incompatible shapes are the only error.
pub trait DistributionMethods {
    /// Returns the common shape of the parameter arrays.
    fn shape(&self) -> &[usize];

    /// Returns the mean of the distribution for each element.
    fn mean(&self) -> ArrayD<f64>;

    /// Returns the variance of the distribution for each element.
    fn variance(&self) -> ArrayD<f64>;

    /// Returns the standard deviation of the distribution for each element.
    fn std(&self) -> ArrayD<f64> {
        self.variance().mapv(f64::sqrt)
    }

    /// Evaluates the probability density function at `y`.
    fn pdf<S, D>(&self, y: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension;

    /// Evaluates the log probability density function at `y`.
    fn logpdf<S, D>(&self, y: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        Ok(self.pdf(y)?.mapv_into(f64::ln))
    }

    /// Evaluates the cumulative distribution function P(Y <= q).
    fn cdf<S, D>(&self, q: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension;

    /// Evaluates the percent point function (inverse CDF / quantile function).
    /// Returns the value y such that P(Y <= y) = p.
    fn ppf<S, D>(&self, p: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension;

    /// Evaluates the percent point function at a single probability for every
    /// element. Cannot fail: a scalar broadcasts against any shape.
    fn ppf_scalar(&self, p: f64) -> ArrayD<f64>;

    /// Generates random samples from the distribution using the thread-local
    /// generator.
    fn sample(&self, n_samples: usize) -> ArrayD<f64>;

    /// Returns the central `1 - alpha` interval for each element.
    ///
    /// # Arguments
    /// * `alpha` - Significance level (e.g., 0.05 for a 95% interval)
    ///
    /// # Returns
    /// Tuple of (lower bounds, upper bounds)
    fn interval(&self, alpha: f64) -> Result<(ArrayD<f64>, ArrayD<f64>)> {
        Ok((
            self.ppf_scalar(alpha / 2.0),
            self.ppf_scalar(1.0 - alpha / 2.0),
        ))
    }

    /// Returns the survival function (1 - CDF) at `q`.
    fn sf<S, D>(&self, q: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        Ok(self.cdf(q)?.mapv_into(|p| 1.0 - p))
    }

    /// Returns the median of the distribution for each element.
    fn median(&self) -> ArrayD<f64> {
        self.ppf_scalar(0.5)
    }

    /// Returns the mode of the distribution for each element (if well-defined).
    /// Default implementation returns the mean; override for distributions where mode != mean.
    fn mode(&self) -> ArrayD<f64> {
        self.mean()
    }
}
