use crate::dist::broadcast::{broadcast_all, broadcast_shape, broadcast_view};
use crate::dist::studentt::{half_beta, t_cdf, t_ppf};
use crate::dist::DistributionMethods;
use crate::error::{Result, SstError};
use log::{debug, log_enabled, Level};
use ndarray::{ArrayBase, ArrayD, Data, Dimension, IxDyn, Zip};
use rand::Rng;

/// How construction treats parameters outside the valid domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validation {
    /// Out-of-domain parameters yield NaN derived constants, which then
    /// propagate through every evaluation.
    #[default]
    Propagate,
    /// Construction fails on the first out-of-domain element, and `interval`
    /// rejects significance levels outside (0, 1).
    Strict,
}

/// A single skewed Student-t element: the four parameters and the constants
/// of the two-piece Student's t they map to.
///
/// The two-piece density is centred at `mu_0` with scale `sigma_0`; left of
/// `mu_0` the t kernel is compressed by `nu`, right of it stretched by `nu`.
/// `mu_0` and `sigma_0` are chosen so that the mean is `mu` and the standard
/// deviation is `sigma`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SstKernel {
    mu: f64,
    sigma: f64,
    nu: f64,
    tau: f64,
    /// Normalizing constant of the standardized density.
    c: f64,
    /// Mean of the standardized two-piece t.
    m: f64,
    /// Variance of the standardized two-piece t.
    s2: f64,
    mu_0: f64,
    sigma_0: f64,
}

impl SstKernel {
    /// Derives the two-piece constants for one parameter element.
    ///
    /// Never fails: parameters outside the domain produce NaN constants.
    pub fn new(mu: f64, sigma: f64, nu: f64, tau: f64) -> Self {
        let nu2 = nu * nu;
        let b = half_beta(tau);

        let c = 2.0 * nu / ((1.0 + nu2) * b * tau.sqrt());
        let m = 2.0 * tau.sqrt() * (nu - 1.0 / nu) / ((tau - 1.0) * b);
        let s2 = (tau / (tau - 2.0)) * (nu2 + 1.0 / nu2 - 1.0) - m * m;

        let s = s2.sqrt();
        SstKernel {
            mu,
            sigma,
            nu,
            tau,
            c,
            m,
            s2,
            mu_0: mu - sigma * m / s,
            sigma_0: sigma / s,
        }
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn nu(&self) -> f64 {
        self.nu
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn m(&self) -> f64 {
        self.m
    }

    pub fn s2(&self) -> f64 {
        self.s2
    }

    /// Split point of the two pieces, which is also the mode.
    pub fn mu_0(&self) -> f64 {
        self.mu_0
    }

    pub fn sigma_0(&self) -> f64 {
        self.sigma_0
    }

    /// Checks `sigma > 0`, `nu > 0`, `tau > 2` and finiteness of every parameter.
    pub fn validate(&self) -> Result<()> {
        let invalid = |name: &'static str, value: f64, reason: &'static str| -> Result<()> {
            Err(SstError::InvalidParameter {
                name,
                value,
                reason,
            })
        };
        if !self.mu.is_finite() {
            return invalid("mu", self.mu, "must be finite");
        }
        if !(self.sigma > 0.0 && self.sigma.is_finite()) {
            return invalid("sigma", self.sigma, "must be positive and finite");
        }
        if !(self.nu > 0.0 && self.nu.is_finite()) {
            return invalid("nu", self.nu, "must be positive and finite");
        }
        if !(self.tau > 2.0 && self.tau.is_finite()) {
            return invalid("tau", self.tau, "must be finite and exceed 2");
        }
        Ok(())
    }

    /// Mean, recovered from the standardized moments (equals `mu` in-domain).
    pub fn mean(&self) -> f64 {
        self.mu_0 + self.sigma_0 * self.m
    }

    /// Variance, recovered from the standardized moments (equals `sigma^2` in-domain).
    pub fn variance(&self) -> f64 {
        self.sigma_0 * self.sigma_0 * self.s2
    }

    /// Base of the t kernel on the left piece, `y < mu_0`.
    fn left_kernel(&self, z: f64) -> f64 {
        1.0 + self.nu * self.nu * z * z / self.tau
    }

    /// Base of the t kernel on the right piece, `y >= mu_0`.
    fn right_kernel(&self, z: f64) -> f64 {
        1.0 + z * z / (self.nu * self.nu * self.tau)
    }

    fn kernel(&self, y: f64) -> f64 {
        let z = (y - self.mu_0) / self.sigma_0;
        if y < self.mu_0 {
            self.left_kernel(z)
        } else {
            self.right_kernel(z)
        }
    }

    /// Probability density at `y`.
    pub fn pdf(&self, y: f64) -> f64 {
        (self.c / self.sigma_0) * self.kernel(y).powf(-(self.tau + 1.0) / 2.0)
    }

    /// Log density at `y`, evaluated without forming the density.
    pub fn ln_pdf(&self, y: f64) -> f64 {
        let z = (y - self.mu_0) / self.sigma_0;
        let excess = if y < self.mu_0 {
            self.nu * self.nu * z * z / self.tau
        } else {
            z * z / (self.nu * self.nu * self.tau)
        };
        (self.c / self.sigma_0).ln() - (self.tau + 1.0) / 2.0 * excess.ln_1p()
    }

    fn left_cdf(&self, q: f64) -> f64 {
        let nu2 = self.nu * self.nu;
        let x = self.nu * (q - self.mu_0) / self.sigma_0;
        (2.0 / (1.0 + nu2)) * t_cdf(x, self.tau)
    }

    fn right_cdf(&self, q: f64) -> f64 {
        let nu2 = self.nu * self.nu;
        let x = (q - self.mu_0) / (self.sigma_0 * self.nu);
        // (1 + 2 nu^2 (t(x) - 1/2)) / (1 + nu^2), with 1 - t(x) taken as t(-x)
        1.0 - (2.0 * nu2 / (1.0 + nu2)) * t_cdf(-x, self.tau)
    }

    /// Cumulative probability P(Y <= q).
    pub fn cdf(&self, q: f64) -> f64 {
        if q < self.mu_0 {
            self.left_cdf(q)
        } else {
            self.right_cdf(q)
        }
    }

    /// Quantile: the value y with P(Y <= y) = p.
    ///
    /// The break between the pieces sits at `p = 1 / (1 + nu^2)`, the mass left
    /// of `mu_0`. `p` outside `[0, 1]` yields NaN.
    pub fn ppf(&self, p: f64) -> f64 {
        if self.mu_0.is_nan() || self.sigma_0.is_nan() {
            return f64::NAN;
        }
        let nu2 = self.nu * self.nu;
        if p <= 1.0 / (1.0 + nu2) {
            let u = p * (1.0 + nu2) / 2.0;
            self.mu_0 + (self.sigma_0 / self.nu) * t_ppf(u, self.tau)
        } else {
            // (p(1 + nu^2) - 1 + nu^2) / (2 nu^2), rearranged to be exact at p = 1
            let u = 1.0 - (1.0 - p) * (1.0 + nu2) / (2.0 * nu2);
            self.mu_0 + self.sigma_0 * self.nu * t_ppf(u, self.tau)
        }
    }
}

/// The skewed Student-t distribution over an n-dimensional array of
/// independent parameter elements.
///
/// In this parameterization the expectation equals `mu` and the standard
/// deviation equals `sigma`. All derived constants are computed once at
/// construction; the value is immutable afterwards and can be shared freely
/// across threads.
///
/// # Parameters
/// * `mu` - mean
/// * `sigma` - standard deviation (`> 0`)
/// * `nu` - skew (`> 0`, `1` is symmetric, `< 1` skews left)
/// * `tau` - tail thickness (`> 2`)
///
/// # Domain
/// By default ([`Validation::Propagate`]) parameters are not checked and
/// out-of-domain elements evaluate to NaN. Use [`SkewedStudentT::with_validation`]
/// with [`Validation::Strict`] to reject them at construction.
#[derive(Debug, Clone)]
pub struct SkewedStudentT {
    kernels: ArrayD<SstKernel>,
    validation: Validation,
}

impl SkewedStudentT {
    /// Creates the distribution from parameter arrays broadcast to a common shape.
    ///
    /// Fails only when the four shapes are not broadcast-compatible.
    pub fn new(
        mu: ArrayD<f64>,
        sigma: ArrayD<f64>,
        nu: ArrayD<f64>,
        tau: ArrayD<f64>,
    ) -> Result<Self> {
        Self::with_validation(mu, sigma, nu, tau, Validation::default())
    }

    /// Creates a 0-dimensional distribution from scalar parameters.
    pub fn from_scalars(mu: f64, sigma: f64, nu: f64, tau: f64) -> Self {
        let kernels = ArrayD::from_elem(IxDyn(&[]), SstKernel::new(mu, sigma, nu, tau));
        Self::log_domain(&kernels);
        SkewedStudentT {
            kernels,
            validation: Validation::Propagate,
        }
    }

    /// Creates the distribution with an explicit parameter-domain policy.
    pub fn with_validation(
        mu: ArrayD<f64>,
        sigma: ArrayD<f64>,
        nu: ArrayD<f64>,
        tau: ArrayD<f64>,
        validation: Validation,
    ) -> Result<Self> {
        let shape = broadcast_all(&[mu.shape(), sigma.shape(), nu.shape(), tau.shape()])?;

        let kernels = Zip::from(broadcast_view(&mu, &shape)?)
            .and(broadcast_view(&sigma, &shape)?)
            .and(broadcast_view(&nu, &shape)?)
            .and(broadcast_view(&tau, &shape)?)
            .map_collect(|&mu, &sigma, &nu, &tau| SstKernel::new(mu, sigma, nu, tau));

        match validation {
            Validation::Strict => {
                for kernel in kernels.iter() {
                    kernel.validate()?;
                }
            }
            Validation::Propagate => Self::log_domain(&kernels),
        }
        debug!(
            "skewed Student-t with parameter shape {:?} ({:?} validation)",
            kernels.shape(),
            validation
        );

        Ok(SkewedStudentT {
            kernels,
            validation,
        })
    }

    fn log_domain(kernels: &ArrayD<SstKernel>) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        let n_invalid = kernels.iter().filter(|k| k.validate().is_err()).count();
        if n_invalid > 0 {
            debug!(
                "{} of {} parameter elements lie outside the valid domain and evaluate to NaN",
                n_invalid,
                kernels.len()
            );
        }
    }

    /// The per-element kernels, in parameter shape.
    pub fn kernels(&self) -> &ArrayD<SstKernel> {
        &self.kernels
    }

    pub fn validation(&self) -> Validation {
        self.validation
    }

    pub fn mu(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.mu)
    }

    pub fn sigma(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.sigma)
    }

    pub fn nu(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.nu)
    }

    pub fn tau(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.tau)
    }

    pub fn c(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.c)
    }

    pub fn m(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.m)
    }

    pub fn s2(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.s2)
    }

    pub fn mu_0(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.mu_0)
    }

    pub fn sigma_0(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.sigma_0)
    }

    /// Applies `f` to every element of `x` paired with its broadcast kernel.
    fn map_kernels<S, D, F>(&self, x: &ArrayBase<S, D>, f: F) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
        F: Fn(&SstKernel, f64) -> f64,
    {
        let shape = broadcast_shape(self.kernels.shape(), x.shape())?;
        let x = broadcast_view(x, &shape)?;
        let kernels = broadcast_view(&self.kernels, &shape)?;
        Ok(Zip::from(x)
            .and(kernels)
            .map_collect(|&x, kernel| f(kernel, x)))
    }

    /// Draws `n_samples` variates using `rng`.
    ///
    /// With 0-dimensional parameters the result has shape `[n_samples]`. With
    /// array parameters one variate is drawn per element, the result has the
    /// parameter shape and `n_samples` is ignored; use
    /// [`SkewedStudentT::sample_shape_using`] to control the shape explicitly.
    pub fn sample_using<R: Rng + ?Sized>(&self, n_samples: usize, rng: &mut R) -> ArrayD<f64> {
        let shape = if self.kernels.ndim() == 0 {
            vec![n_samples]
        } else {
            if n_samples != 1 {
                debug!(
                    "sample count {} ignored for parameter shape {:?}",
                    n_samples,
                    self.kernels.shape()
                );
            }
            self.kernels.shape().to_vec()
        };

        let uniform = ArrayD::from_shape_simple_fn(IxDyn(&shape), || rng.random::<f64>());
        Zip::from(&uniform)
            .and_broadcast(&self.kernels)
            .map_collect(|&u, kernel| kernel.ppf(u))
    }

    /// Draws uniforms of `shape`, broadcast against the parameter shape, and
    /// maps them through the quantile function.
    pub fn sample_shape_using<R: Rng + ?Sized>(
        &self,
        shape: &[usize],
        rng: &mut R,
    ) -> Result<ArrayD<f64>> {
        let uniform = ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.random::<f64>());
        self.ppf(&uniform)
    }
}

impl DistributionMethods for SkewedStudentT {
    fn shape(&self) -> &[usize] {
        self.kernels.shape()
    }

    fn mean(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.mean())
    }

    fn variance(&self) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.variance())
    }

    fn pdf<S, D>(&self, y: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.map_kernels(y, SstKernel::pdf)
    }

    fn logpdf<S, D>(&self, y: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.map_kernels(y, SstKernel::ln_pdf)
    }

    fn cdf<S, D>(&self, q: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.map_kernels(q, SstKernel::cdf)
    }

    fn ppf<S, D>(&self, p: &ArrayBase<S, D>) -> Result<ArrayD<f64>>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        self.map_kernels(p, SstKernel::ppf)
    }

    fn ppf_scalar(&self, p: f64) -> ArrayD<f64> {
        self.kernels.mapv(|k| k.ppf(p))
    }

    fn sample(&self, n_samples: usize) -> ArrayD<f64> {
        self.sample_using(n_samples, &mut rand::rng())
    }

    fn interval(&self, alpha: f64) -> Result<(ArrayD<f64>, ArrayD<f64>)> {
        if self.validation == Validation::Strict && !(alpha > 0.0 && alpha < 1.0) {
            return Err(SstError::InvalidProbability { value: alpha });
        }
        Ok((
            self.ppf_scalar(alpha / 2.0),
            self.ppf_scalar(1.0 - alpha / 2.0),
        ))
    }

    fn mode(&self) -> ArrayD<f64> {
        self.mu_0()
    }
}
