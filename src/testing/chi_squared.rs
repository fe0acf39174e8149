//! Chi-squared test of independence on an r×c contingency table.

use tracing::{debug, instrument, warn};

use crate::config::check_alpha;
use crate::critical::Distribution;
use crate::error::{Result, TestError};
use crate::verdict::{Tail, Verdict};

/// Result of the chi-squared test of independence.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChiSquaredIndependenceResult {
    pub observed: Vec<Vec<u64>>,
    /// Eᵢⱼ = Rᵢ·Cⱼ / N.
    pub expected: Vec<Vec<f64>>,
    pub row_totals: Vec<u64>,
    pub col_totals: Vec<u64>,
    /// N, the grand total.
    pub total: u64,
    /// χ² = Σ (Oᵢⱼ − Eᵢⱼ)² / Eᵢⱼ over cells with Eᵢⱼ > 0.
    pub statistic: f64,
    /// (r − 1)(c − 1).
    pub df: usize,
    /// Cells left out of the sum because their expected count is 0.
    pub skipped_cells: usize,
    pub verdict: Verdict,
    pub conclusion: String,
}

/// Chi-squared test of independence: H₀: rows and columns are independent.
///
/// # Algorithm
///
/// Row totals Rᵢ, column totals Cⱼ and grand total N give expected counts
/// Eᵢⱼ = RᵢCⱼ/N. The statistic χ² = Σ (Oᵢⱼ − Eᵢⱼ)²/Eᵢⱼ is compared with the
/// upper-tail χ²((r−1)(c−1)) critical value.
///
/// A cell whose expected count is 0 (an all-zero row or column) is skipped
/// and counted in `skipped_cells`; it contributes nothing to χ². Degrees of
/// freedom still use the full table shape.
///
/// # Errors
///
/// - [`TestError::RaggedTable`] when rows differ in length.
/// - [`TestError::InsufficientData`] with fewer than 2 rows or 2 columns.
/// - [`TestError::EmptyTable`] when every count is 0.
/// - [`TestError::CountOverflow`] when a total exceeds `u64::MAX`.
///
/// # References
///
/// Pearson (1900). "On the criterion that a given system of deviations..."
///
/// # Examples
///
/// ```
/// use u_inference::testing::chi_squared_independence;
///
/// let table = [[30u64, 10], [10, 50]];
/// let r = chi_squared_independence(&table, 0.05).unwrap();
/// assert_eq!(r.df, 1);
/// assert!(r.verdict.reject);
/// ```
#[instrument(skip_all, fields(rows = table.len()))]
pub fn chi_squared_independence<R: AsRef<[u64]>>(
    table: &[R],
    alpha: f64,
) -> Result<ChiSquaredIndependenceResult> {
    let alpha = check_alpha(alpha)?;

    let rows = table.len();
    if rows < 2 {
        return Err(TestError::InsufficientData {
            test: "chi-squared independence (rows)",
            required: 2,
            actual: rows,
        });
    }
    let cols = table[0].as_ref().len();
    for (i, row) in table.iter().enumerate() {
        let len = row.as_ref().len();
        if len != cols {
            return Err(TestError::RaggedTable {
                row: i,
                expected: cols,
                actual: len,
            });
        }
    }
    if cols < 2 {
        return Err(TestError::InsufficientData {
            test: "chi-squared independence (columns)",
            required: 2,
            actual: cols,
        });
    }

    let observed: Vec<Vec<u64>> = table.iter().map(|r| r.as_ref().to_vec()).collect();
    let row_totals = observed
        .iter()
        .map(|r| checked_total(r.iter().copied()))
        .collect::<Result<Vec<u64>>>()?;
    let col_totals = (0..cols)
        .map(|j| checked_total(observed.iter().map(|r| r[j])))
        .collect::<Result<Vec<u64>>>()?;
    let total = checked_total(row_totals.iter().copied())?;
    if total == 0 {
        return Err(TestError::EmptyTable);
    }

    let n = total as f64;
    let expected: Vec<Vec<f64>> = row_totals
        .iter()
        .map(|&ri| {
            col_totals
                .iter()
                .map(|&cj| ri as f64 * cj as f64 / n)
                .collect()
        })
        .collect();

    let mut statistic = 0.0;
    let mut skipped_cells = 0;
    for (o_row, e_row) in observed.iter().zip(expected.iter()) {
        for (&o, &e) in o_row.iter().zip(e_row.iter()) {
            if e > 0.0 {
                let diff = o as f64 - e;
                statistic += diff * diff / e;
            } else {
                skipped_cells += 1;
            }
        }
    }
    if skipped_cells > 0 {
        warn!(skipped_cells, "cells with zero expected count left out of χ²");
    }

    let df = (rows - 1) * (cols - 1);
    let verdict = Verdict::decide(
        statistic,
        Distribution::ChiSquared { df: df as f64 },
        Tail::Upper,
        alpha,
    )?;
    debug!(statistic, df, reject = verdict.reject, "chi-squared independence");

    let conclusion = verdict.conclude(
        "χ²",
        "The row and column variables are not independent.",
        "No significant association between the row and column variables.",
    );

    Ok(ChiSquaredIndependenceResult {
        observed,
        expected,
        row_totals,
        col_totals,
        total,
        statistic,
        df,
        skipped_cells,
        verdict,
        conclusion,
    })
}

fn checked_total(mut counts: impl Iterator<Item = u64>) -> Result<u64> {
    counts.try_fold(0u64, |acc, c| acc.checked_add(c).ok_or(TestError::CountOverflow))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chi_squared_uniform_table() {
        let table = vec![vec![10u64, 10], vec![10, 10]];
        let r = chi_squared_independence(&table, 0.05).expect("should compute");
        assert_eq!(r.statistic, 0.0);
        assert_eq!(r.df, 1);
        assert_eq!(r.total, 40);
        assert_eq!(r.skipped_cells, 0);
        assert!(!r.verdict.reject);
        assert!(r.conclusion.contains("No significant association"));
    }

    #[test]
    fn chi_squared_known_value() {
        let table = [[30u64, 10], [10, 50]];
        let r = chi_squared_independence(&table, 0.05).expect("should compute");
        // E = [[16, 24], [24, 36]]; χ² = 196·(1/16 + 2/24 + 1/36)
        let expected_stat = 196.0 * (1.0 / 16.0 + 2.0 / 24.0 + 1.0 / 36.0);
        assert!((r.statistic - expected_stat).abs() < 1e-10);
        assert_eq!(r.row_totals, vec![40, 60]);
        assert_eq!(r.col_totals, vec![40, 60]);
        assert!((r.expected[1][1] - 36.0).abs() < 1e-12);
        // χ²(0.95; 1) = 3.841
        assert!((r.verdict.critical_value - 3.841_459).abs() < 1e-3);
        assert!(r.verdict.reject);
    }

    #[test]
    fn chi_squared_three_by_three() {
        let table = [[20u64, 15, 25], [30, 20, 10], [10, 25, 15]];
        let r = chi_squared_independence(&table, 0.05).expect("should compute");
        assert_eq!(r.df, 4);
        assert_eq!(r.total, 170);
        assert!(r.statistic > 0.0);
        assert!(r.verdict.p_value > 0.0 && r.verdict.p_value < 1.0);
    }

    #[test]
    fn chi_squared_zero_row_is_skipped() {
        let table = [[0u64, 0], [5, 10]];
        let r = chi_squared_independence(&table, 0.05).expect("should compute");
        assert_eq!(r.skipped_cells, 2);
        assert_eq!(r.df, 1);
        assert!(r.statistic.abs() < 1e-12);
        assert!(!r.verdict.reject);
    }

    #[test]
    fn chi_squared_edge_cases() {
        let one_row = [[1u64, 2, 3]];
        assert!(matches!(
            chi_squared_independence(&one_row, 0.05),
            Err(TestError::InsufficientData { actual: 1, .. })
        ));
        let one_col = [[1u64], [2]];
        assert!(matches!(
            chi_squared_independence(&one_col, 0.05),
            Err(TestError::InsufficientData { actual: 1, .. })
        ));
        let ragged = vec![vec![1u64, 2], vec![3]];
        assert_eq!(
            chi_squared_independence(&ragged, 0.05).unwrap_err(),
            TestError::RaggedTable {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
        let huge = [[u64::MAX, 1], [1, 1]];
        assert_eq!(
            chi_squared_independence(&huge, 0.05).unwrap_err(),
            TestError::CountOverflow
        );
        let huge_col = [[u64::MAX, 0], [1, 0]];
        assert_eq!(
            chi_squared_independence(&huge_col, 0.05).unwrap_err(),
            TestError::CountOverflow
        );
        let zeros = [[0u64, 0], [0, 0]];
        assert_eq!(
            chi_squared_independence(&zeros, 0.05).unwrap_err(),
            TestError::EmptyTable
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn table() -> impl Strategy<Value = Vec<Vec<u64>>> {
            (2usize..6, 2usize..6).prop_flat_map(|(r, c)| {
                proptest::collection::vec(proptest::collection::vec(1u64..200, c), r)
            })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(300))]

            #[test]
            fn expected_counts_preserve_margins(t in table()) {
                let r = chi_squared_independence(&t, 0.05).unwrap();
                let sum_expected: f64 = r.expected.iter().flatten().sum();
                prop_assert!((sum_expected - r.total as f64).abs() < 1e-6 * r.total as f64);
                for (i, row) in r.expected.iter().enumerate() {
                    let s: f64 = row.iter().sum();
                    prop_assert!((s - r.row_totals[i] as f64).abs() < 1e-6 * r.total as f64);
                }
                prop_assert!(r.statistic >= 0.0);
                prop_assert_eq!(r.df, (t.len() - 1) * (t[0].len() - 1));
            }
        }
    }
}
