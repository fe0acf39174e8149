//! Uniform entry point over every test.
//!
//! A presentation layer that lets a user pick a test at runtime builds a
//! [`TestRequest`] with owned data and calls [`TestRequest::run`]; the
//! returned [`TestOutcome`] exposes the decision and conclusion without
//! matching on the concrete result type.
//!
//! # Examples
//!
//! ```
//! use u_inference::dispatch::{TestKind, TestRequest};
//!
//! let request = TestRequest::Proportion { successes: 10, trials: 20, p0: 0.5 };
//! let outcome = request.run(0.05).unwrap();
//! assert_eq!(outcome.kind(), TestKind::Proportion);
//! assert_eq!(outcome.verdict().map(|v| v.reject), Some(false));
//! ```

use crate::config::{CriticalValuePolicy, LeveneCenter};
use crate::correlation::{
    kendall_tau_with_policy, pearson, spearman_with_policy, KendallResult, PearsonResult,
    SpearmanResult,
};
use crate::error::Result;
use crate::testing::{
    bartlett_test, chi_squared_independence, levene_test_with_center, mann_whitney_u_test,
    one_way_anova, proportion_z_test, wilcoxon_signed_rank_test, AnovaResult, BartlettResult,
    ChiSquaredIndependenceResult, LeveneResult, MannWhitneyResult, ProportionResult,
    WilcoxonResult,
};
use crate::verdict::Verdict;

/// The available tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestKind {
    Kendall,
    Pearson,
    Spearman,
    MannWhitney,
    Wilcoxon,
    Anova,
    Bartlett,
    Levene,
    Proportion,
    ChiSquared,
}

impl TestKind {
    /// Every test, in menu order.
    pub const ALL: [TestKind; 10] = [
        TestKind::Kendall,
        TestKind::Pearson,
        TestKind::Spearman,
        TestKind::MannWhitney,
        TestKind::Wilcoxon,
        TestKind::Anova,
        TestKind::Bartlett,
        TestKind::Levene,
        TestKind::Proportion,
        TestKind::ChiSquared,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TestKind::Kendall => "Kendall's tau",
            TestKind::Pearson => "Pearson correlation",
            TestKind::Spearman => "Spearman rank correlation",
            TestKind::MannWhitney => "Mann-Whitney U",
            TestKind::Wilcoxon => "Wilcoxon signed-rank",
            TestKind::Anova => "One-way ANOVA",
            TestKind::Bartlett => "Bartlett's test",
            TestKind::Levene => "Levene's test",
            TestKind::Proportion => "One-sample proportion z-test",
            TestKind::ChiSquared => "Chi-squared independence",
        }
    }
}

impl std::fmt::Display for TestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A test together with its input data.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestRequest {
    Kendall {
        x: Vec<f64>,
        y: Vec<f64>,
        policy: CriticalValuePolicy,
    },
    Pearson {
        x: Vec<f64>,
        y: Vec<f64>,
    },
    Spearman {
        x: Vec<f64>,
        y: Vec<f64>,
        policy: CriticalValuePolicy,
    },
    MannWhitney {
        a: Vec<f64>,
        b: Vec<f64>,
    },
    /// Differences are taken as `y − x`.
    Wilcoxon {
        x: Vec<f64>,
        y: Vec<f64>,
    },
    Anova {
        groups: Vec<Vec<f64>>,
    },
    Bartlett {
        groups: Vec<Vec<f64>>,
    },
    Levene {
        groups: Vec<Vec<f64>>,
        center: LeveneCenter,
    },
    Proportion {
        successes: u64,
        trials: u64,
        p0: f64,
    },
    ChiSquared {
        table: Vec<Vec<u64>>,
    },
}

fn group_refs(groups: &[Vec<f64>]) -> Vec<&[f64]> {
    groups.iter().map(Vec::as_slice).collect()
}

impl TestRequest {
    pub fn kind(&self) -> TestKind {
        match self {
            TestRequest::Kendall { .. } => TestKind::Kendall,
            TestRequest::Pearson { .. } => TestKind::Pearson,
            TestRequest::Spearman { .. } => TestKind::Spearman,
            TestRequest::MannWhitney { .. } => TestKind::MannWhitney,
            TestRequest::Wilcoxon { .. } => TestKind::Wilcoxon,
            TestRequest::Anova { .. } => TestKind::Anova,
            TestRequest::Bartlett { .. } => TestKind::Bartlett,
            TestRequest::Levene { .. } => TestKind::Levene,
            TestRequest::Proportion { .. } => TestKind::Proportion,
            TestRequest::ChiSquared { .. } => TestKind::ChiSquared,
        }
    }

    /// Runs the test at significance level α.
    ///
    /// # Errors
    ///
    /// Whatever the underlying test function returns for this input.
    pub fn run(&self, alpha: f64) -> Result<TestOutcome> {
        let outcome = match self {
            TestRequest::Kendall { x, y, policy } => {
                TestOutcome::Kendall(kendall_tau_with_policy(x, y, alpha, *policy)?)
            }
            TestRequest::Pearson { x, y } => TestOutcome::Pearson(pearson(x, y, alpha)?),
            TestRequest::Spearman { x, y, policy } => {
                TestOutcome::Spearman(spearman_with_policy(x, y, alpha, *policy)?)
            }
            TestRequest::MannWhitney { a, b } => {
                TestOutcome::MannWhitney(mann_whitney_u_test(a, b, alpha)?)
            }
            TestRequest::Wilcoxon { x, y } => {
                TestOutcome::Wilcoxon(wilcoxon_signed_rank_test(x, y, alpha)?)
            }
            TestRequest::Anova { groups } => {
                TestOutcome::Anova(one_way_anova(&group_refs(groups), alpha)?)
            }
            TestRequest::Bartlett { groups } => {
                TestOutcome::Bartlett(bartlett_test(&group_refs(groups), alpha)?)
            }
            TestRequest::Levene { groups, center } => TestOutcome::Levene(
                levene_test_with_center(&group_refs(groups), alpha, *center)?,
            ),
            TestRequest::Proportion {
                successes,
                trials,
                p0,
            } => TestOutcome::Proportion(proportion_z_test(*successes, *trials, *p0, alpha)?),
            TestRequest::ChiSquared { table } => {
                TestOutcome::ChiSquared(chi_squared_independence(table, alpha)?)
            }
        };
        Ok(outcome)
    }
}

/// The result of a [`TestRequest`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TestOutcome {
    Kendall(KendallResult),
    Pearson(PearsonResult),
    Spearman(SpearmanResult),
    MannWhitney(MannWhitneyResult),
    Wilcoxon(WilcoxonResult),
    Anova(AnovaResult),
    Bartlett(BartlettResult),
    Levene(LeveneResult),
    Proportion(ProportionResult),
    ChiSquared(ChiSquaredIndependenceResult),
}

impl TestOutcome {
    pub fn kind(&self) -> TestKind {
        match self {
            TestOutcome::Kendall(_) => TestKind::Kendall,
            TestOutcome::Pearson(_) => TestKind::Pearson,
            TestOutcome::Spearman(_) => TestKind::Spearman,
            TestOutcome::MannWhitney(_) => TestKind::MannWhitney,
            TestOutcome::Wilcoxon(_) => TestKind::Wilcoxon,
            TestOutcome::Anova(_) => TestKind::Anova,
            TestOutcome::Bartlett(_) => TestKind::Bartlett,
            TestOutcome::Levene(_) => TestKind::Levene,
            TestOutcome::Proportion(_) => TestKind::Proportion,
            TestOutcome::ChiSquared(_) => TestKind::ChiSquared,
        }
    }

    pub fn conclusion(&self) -> &str {
        match self {
            TestOutcome::Kendall(r) => &r.conclusion,
            TestOutcome::Pearson(r) => &r.conclusion,
            TestOutcome::Spearman(r) => &r.conclusion,
            TestOutcome::MannWhitney(r) => &r.conclusion,
            TestOutcome::Wilcoxon(r) => &r.conclusion,
            TestOutcome::Anova(r) => &r.conclusion,
            TestOutcome::Bartlett(r) => &r.conclusion,
            TestOutcome::Levene(r) => &r.conclusion,
            TestOutcome::Proportion(r) => &r.conclusion,
            TestOutcome::ChiSquared(r) => &r.conclusion,
        }
    }

    /// The decision, or `None` for a Spearman result too small for the
    /// normal approximation.
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            TestOutcome::Kendall(r) => Some(&r.verdict),
            TestOutcome::Pearson(r) => Some(&r.verdict),
            TestOutcome::Spearman(r) => r.verdict(),
            TestOutcome::MannWhitney(r) => Some(&r.verdict),
            TestOutcome::Wilcoxon(r) => Some(&r.verdict),
            TestOutcome::Anova(r) => Some(&r.verdict),
            TestOutcome::Bartlett(r) => Some(&r.verdict),
            TestOutcome::Levene(r) => Some(&r.verdict),
            TestOutcome::Proportion(r) => Some(&r.verdict),
            TestOutcome::ChiSquared(r) => Some(&r.verdict),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TestError;

    fn sample_requests() -> Vec<TestRequest> {
        let x: Vec<f64> = (1..=12).map(f64::from).collect();
        let y: Vec<f64> = vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0, 8.0, 7.0, 10.0, 9.0, 12.0, 11.5];
        let groups = vec![
            vec![5.0, 6.0, 7.0, 5.5, 6.5],
            vec![8.0, 9.0, 8.5, 9.5, 8.0],
            vec![4.0, 3.0, 3.5, 4.5, 4.0],
        ];
        vec![
            TestRequest::Kendall {
                x: x.clone(),
                y: y.clone(),
                policy: CriticalValuePolicy::default(),
            },
            TestRequest::Pearson {
                x: x.clone(),
                y: y.clone(),
            },
            TestRequest::Spearman {
                x: x.clone(),
                y: y.clone(),
                policy: CriticalValuePolicy::default(),
            },
            TestRequest::MannWhitney {
                a: x.clone(),
                b: y.iter().map(|v| v + 20.0).collect(),
            },
            TestRequest::Wilcoxon {
                x: x.clone(),
                y: y.clone(),
            },
            TestRequest::Anova {
                groups: groups.clone(),
            },
            TestRequest::Bartlett {
                groups: groups.clone(),
            },
            TestRequest::Levene {
                groups,
                center: LeveneCenter::default(),
            },
            TestRequest::Proportion {
                successes: 10,
                trials: 20,
                p0: 0.5,
            },
            TestRequest::ChiSquared {
                table: vec![vec![30, 10], vec![10, 50]],
            },
        ]
    }

    #[test]
    fn every_kind_runs() {
        let requests = sample_requests();
        let kinds: Vec<TestKind> = requests.iter().map(TestRequest::kind).collect();
        assert_eq!(kinds, TestKind::ALL);

        for request in &requests {
            let outcome = request.run(0.05).expect("should compute");
            assert_eq!(outcome.kind(), request.kind());
            assert!(outcome.conclusion().contains("0.050"), "{}", outcome.conclusion());
            let verdict = outcome.verdict().expect("n > 10 for every request");
            assert_eq!(verdict.alpha, 0.05);
        }
    }

    #[test]
    fn outcome_matches_direct_call() {
        let request = TestRequest::ChiSquared {
            table: vec![vec![10, 10], vec![10, 10]],
        };
        let outcome = request.run(0.05).expect("should compute");
        let direct = chi_squared_independence(&[[10u64, 10], [10, 10]], 0.05)
            .expect("should compute");
        assert_eq!(outcome, TestOutcome::ChiSquared(direct));
    }

    #[test]
    fn small_spearman_has_no_verdict() {
        let request = TestRequest::Spearman {
            x: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            y: vec![2.0, 1.0, 4.0, 3.0, 5.0],
            policy: CriticalValuePolicy::Lookup,
        };
        let outcome = request.run(0.05).expect("should compute");
        assert!(outcome.verdict().is_none());
    }

    #[test]
    fn errors_propagate() {
        let request = TestRequest::Pearson {
            x: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            y: vec![2.0, 4.0, 6.0, 8.0, 10.0],
        };
        assert!(matches!(
            request.run(0.05),
            Err(TestError::PerfectCorrelation { .. })
        ));
        let request = TestRequest::Proportion {
            successes: 1,
            trials: 2,
            p0: 0.5,
        };
        assert_eq!(request.run(1.5).unwrap_err(), TestError::InvalidAlpha(1.5));
    }

    #[test]
    fn kind_names_are_distinct() {
        let mut names: Vec<&str> = TestKind::ALL.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), TestKind::ALL.len());
        assert_eq!(TestKind::Anova.to_string(), "One-way ANOVA");
    }
}
