//! # u-inference
//!
//! Classical hypothesis tests decided against critical values of the
//! normal, Student-t, F and chi-squared distributions.
//!
//! Every test takes raw `f64` samples (or a count table) plus a
//! significance level α, and returns a typed result with the intermediate
//! quantities, a [`Verdict`] and a human-readable conclusion. Invalid or
//! degenerate input yields a [`TestError`], never a panic.
//!
//! ## Modules
//!
//! - [`correlation`] — Kendall's tau, Pearson, Spearman
//! - [`testing`] — Mann-Whitney U, Wilcoxon signed-rank, ANOVA, Bartlett,
//!   Levene, proportion z-test, chi-squared independence
//! - [`rank`] — Midrank assignment shared by the rank-based tests
//! - [`critical`] — Quantiles and tail probabilities of reference distributions
//! - [`verdict`] — Decision against a critical value
//! - [`dispatch`] — Runtime selection of a test by [`TestKind`]
//! - [`config`] — Defaults and per-call policies
//!
//! ## Logging
//!
//! Tests emit `tracing` spans and events at `debug` level; policy branches
//! such as skipped contingency cells log at `warn`. No subscriber is
//! installed by the library.
//!
//! ## Example
//!
//! ```
//! use u_inference::testing::one_way_anova;
//!
//! let a = [1.0, 2.0, 3.0];
//! let r = one_way_anova(&[&a, &a, &a], 0.05).unwrap();
//! assert_eq!(r.f_statistic, 0.0);
//! assert!(!r.verdict.reject);
//! ```

pub mod config;
pub mod correlation;
pub mod critical;
pub mod dispatch;
pub mod error;
pub mod rank;
pub mod testing;
pub mod verdict;

pub use config::{CriticalValuePolicy, LeveneCenter, DEFAULT_ALPHA};
pub use dispatch::{TestKind, TestOutcome, TestRequest};
pub use error::{Result, TestError};
pub use verdict::{Tail, Verdict};
