//! Standard (symmetric) Student's t evaluators.
//!
//! Thin wrappers over `statrs` that keep NaN-propagating floating-point
//! semantics: arguments outside the domain of the underlying routine return
//! NaN instead of reaching its assertions.
//!
//! Two regions bypass statrs' inverse, which panics or fails to converge there:
//! - lower-tail probabilities below [`TAIL_P`] are inverted by bisecting
//!   [`t_cdf`] on `ln|x|`;
//! - above [`LARGE_DF`] degrees of freedom (including `+inf`) the quantile is
//!   the Cornish-Fisher expansion around the normal quantile, and the CDF
//!   inverts that same expansion, so the two stay mutually consistent.

use statrs::distribution::{ContinuousCDF, Normal, StudentsT as StudentsTDist};
use statrs::function::beta::checked_beta;

/// Lower-tail probability below which the quantile is found by bisection.
pub const TAIL_P: f64 = 1e-12;

/// Degrees of freedom above which the Cornish-Fisher expansion is used.
pub const LARGE_DF: f64 = 1e4;

const TAIL_ITERATIONS: usize = 200;
const NEWTON_ITERATIONS: usize = 8;

/// The standard Student's t with `df` degrees of freedom, if `df` is valid.
fn standard_t(df: f64) -> Option<StudentsTDist> {
    StudentsTDist::new(0.0, 1.0, df).ok()
}

/// The Beta function B(a, b); NaN when either argument is not positive.
pub fn beta(a: f64, b: f64) -> f64 {
    checked_beta(a, b).unwrap_or(f64::NAN)
}

/// B(1/2, df/2), the Beta factor of the Student's t normalizer.
///
/// Above [`LARGE_DF`] the `ln_gamma` difference behind [`beta`] loses digits,
/// so the ratio Γ(df/2 + 1/2) / Γ(df/2) comes from its asymptotic series.
pub fn half_beta(df: f64) -> f64 {
    if df.is_nan() || df <= LARGE_DF {
        return beta(0.5, df / 2.0);
    }
    let b = df / 2.0;
    let inv = 1.0 / b;
    let series =
        1.0 + inv * (-1.0 / 8.0 + inv * (1.0 / 128.0 + inv * (5.0 / 1024.0 - inv * 21.0 / 32768.0)));
    std::f64::consts::PI.sqrt() / (b.sqrt() * series)
}

/// Cumulative distribution of the standard Student's t at `x`.
pub fn t_cdf(x: f64, df: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if df > LARGE_DF {
        return Normal::standard().cdf(normal_equivalent(x, df));
    }
    match standard_t(df) {
        Some(d) => d.cdf(x),
        None => f64::NAN,
    }
}

/// Percent point function (inverse CDF) of the standard Student's t.
///
/// Returns `-inf` at `p = 0`, `+inf` at `p = 1`, exactly 0 at the median and
/// NaN outside `[0, 1]` or for `df` that is not positive.
pub fn t_ppf(p: f64, df: f64) -> f64 {
    if !(0.0..=1.0).contains(&p) || df.is_nan() || df <= 0.0 {
        return f64::NAN;
    }
    if p == 0.0 {
        return f64::NEG_INFINITY;
    }
    if p == 1.0 {
        return f64::INFINITY;
    }
    if p == 0.5 {
        return 0.0;
    }

    // Solve in the lower tail; 1 - p is exact for p > 1/2
    let lower = p.min(1.0 - p);
    let x = if df > LARGE_DF {
        cornish_fisher(Normal::standard().inverse_cdf(lower), df).0
    } else if lower < TAIL_P {
        tail_ppf(lower, df)
    } else {
        match standard_t(df) {
            Some(d) => d.inverse_cdf(lower),
            None => f64::NAN,
        }
    };

    if p < 0.5 {
        x
    } else {
        -x
    }
}

/// Lower-tail quantile for `u < TAIL_P`.
///
/// Brackets the root by doubling `|x|`, then bisects geometrically.
/// `t_cdf(-1, df)` exceeds `TAIL_P` for every positive `df`.
fn tail_ppf(u: f64, df: f64) -> f64 {
    let mut near = 1.0_f64;
    let mut far = 2.0_f64;
    while t_cdf(-far, df) > u {
        near = far;
        far *= 2.0;
        if far.is_infinite() {
            return f64::NEG_INFINITY;
        }
    }

    for _ in 0..TAIL_ITERATIONS {
        let mid = near.sqrt() * far.sqrt();
        if mid <= near || mid >= far {
            break;
        }
        if t_cdf(-mid, df) > u {
            near = mid;
        } else {
            far = mid;
        }
    }
    -(near.sqrt() * far.sqrt())
}

/// Cornish-Fisher expansion of the t quantile in terms of the standard normal
/// quantile `z` (Abramowitz & Stegun 26.7.5), with its derivative in `z`.
fn cornish_fisher(z: f64, df: f64) -> (f64, f64) {
    if df.is_infinite() {
        return (z, 1.0);
    }
    let w = z * z;
    // g_k(z) / z and g_k'(z)
    let g = [
        (w + 1.0) / 4.0,
        ((5.0 * w + 16.0) * w + 3.0) / 96.0,
        (((3.0 * w + 19.0) * w + 17.0) * w - 15.0) / 384.0,
        ((((79.0 * w + 776.0) * w + 1482.0) * w - 1920.0) * w - 945.0) / 92160.0,
    ];
    let dg = [
        (3.0 * w + 1.0) / 4.0,
        ((25.0 * w + 48.0) * w + 3.0) / 96.0,
        (((21.0 * w + 95.0) * w + 51.0) * w - 15.0) / 384.0,
        ((((711.0 * w + 5432.0) * w + 7410.0) * w - 5760.0) * w - 945.0) / 92160.0,
    ];

    let mut t = z;
    let mut dt = 1.0;
    let mut scale = 1.0;
    for (gk, dgk) in g.iter().zip(dg.iter()) {
        scale /= df;
        t += z * gk * scale;
        dt += dgk * scale;
    }
    (t, dt)
}

/// The normal quantile `z` whose Cornish-Fisher image is `x`.
fn normal_equivalent(x: f64, df: f64) -> f64 {
    // Beyond |x| = 1000 both tails underflow for every df above LARGE_DF
    if df.is_infinite() || x.abs() > 1e3 {
        return x;
    }
    // Abramowitz & Stegun 26.7.8 as the starting point
    let mut z = x * (1.0 - 1.0 / (4.0 * df)) / (1.0 + x * x / (2.0 * df)).sqrt();
    for _ in 0..NEWTON_ITERATIONS {
        let (t, dt) = cornish_fisher(z, df);
        let step = (t - x) / dt;
        z -= step;
        if step.abs() <= f64::EPSILON * (1.0 + z.abs()) {
            break;
        }
    }
    z
}
