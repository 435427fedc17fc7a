//! The skewed Student-t distribution (SST).
//!
//! A four-parameter continuous distribution generalizing Student's t with a
//! skewness control. It is parameterized so that the expectation equals `mu`
//! and the standard deviation equals `sigma`; `nu` controls the skew (`nu = 1`
//! is symmetric) and `tau` the tail thickness (`tau > 2`).
//!
//! Parameters may be scalars or n-dimensional arrays of independent
//! distributions; evaluation inputs broadcast against them elementwise.
//!
//! ```
//! use ndarray::{arr0, array};
//! use sstudentt::dist::{DistributionMethods, SkewedStudentT};
//!
//! let sst = SkewedStudentT::from_scalars(5.0, 2.0, 1.5, 8.0);
//! let q = sst.ppf(&array![0.05, 0.5, 0.95]).unwrap();
//! let p = sst.cdf(&q).unwrap();
//! assert!((p[[1]] - 0.5).abs() < 1e-7);
//!
//! let density = sst.pdf(&arr0(5.0)).unwrap();
//! assert!(density.sum() > 0.0);
//! ```

pub mod dist;
pub mod error;

// Re-export commonly used types at crate root
pub use dist::{DistributionMethods, SkewedStudentT, SstKernel, Validation};
pub use error::{Result, SstError};
