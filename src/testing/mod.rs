//! Hypothesis tests decided against tabulated critical values.
//!
//! Every test validates its input, computes a statistic, looks up the
//! critical value of its reference distribution at α and returns a typed
//! result carrying a [`Verdict`](crate::verdict::Verdict) and a
//! human-readable conclusion.
//!
//! # Non-parametric
//!
//! - [`mann_whitney_u_test`] — Two independent samples, normal approximation
//! - [`wilcoxon_signed_rank_test`] — Paired samples, normal approximation
//!
//! # Analysis of variance
//!
//! - [`one_way_anova`] — Equality of group means, F(k−1, N−k)
//! - [`bartlett_test`] — Equality of group variances, χ²(k−1)
//! - [`levene_test`] — Equality of group variances, robust, F(k−1, N−k)
//!
//! # Counts
//!
//! - [`proportion_z_test`] — One-sample proportion against p₀
//! - [`chi_squared_independence`] — r×c contingency table, χ²((r−1)(c−1))
//!
//! # References
//!
//! - Conover (1999), *Practical Nonparametric Statistics*, 3rd ed.
//! - Montgomery (2017), *Design and Analysis of Experiments*, 9th ed.

mod anova;
mod chi_squared;
mod nonparametric;
mod proportion;
mod variance;

pub use anova::{one_way_anova, AnovaResult};
pub use chi_squared::{chi_squared_independence, ChiSquaredIndependenceResult};
pub use nonparametric::{
    mann_whitney_u_test, wilcoxon_signed_rank_test, MannWhitneyResult, WilcoxonResult,
};
pub use proportion::{proportion_z_test, ProportionResult};
pub use variance::{bartlett_test, levene_test, levene_test_with_center, BartlettResult, LeveneResult};
