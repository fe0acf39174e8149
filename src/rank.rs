//! Rank assignment with midrank tie handling.
//!
//! Tied values receive the mean of the rank positions they jointly occupy,
//! so the ranks of n values always sum to n(n+1)/2.
//!
//! # Examples
//!
//! ```
//! use u_inference::rank::midranks;
//!
//! let r = midranks(&[10.0, 30.0, 20.0, 20.0]).unwrap();
//! assert_eq!(r, vec![1.0, 4.0, 2.5, 2.5]);
//! ```

use std::cmp::Ordering;

use crate::error::{Result, TestError};

/// An observation from a pooled ranking, tagged with the sample it came from.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedObservation {
    pub value: f64,
    /// Index of the origin sample in the pool.
    pub sample: usize,
    pub rank: f64,
}

/// A ranked absolute difference that remembers its sign.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SignedRank {
    /// |d|.
    pub magnitude: f64,
    pub positive: bool,
    pub rank: f64,
}

/// Ranks values in their original order.
///
/// # Errors
///
/// [`TestError::EmptySample`] when `values` is empty.
pub fn midranks(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(TestError::EmptySample);
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| total_cmp(values[a], values[b]));

    let sorted_ranks = tied_ranks(order.iter().map(|&i| values[i]));
    let mut ranks = vec![0.0; values.len()];
    for (&orig, rank) in order.iter().zip(sorted_ranks) {
        ranks[orig] = rank;
    }
    Ok(ranks)
}

/// Pools several samples and ranks all observations together.
///
/// Output is in ascending value order; each entry carries the index of the
/// sample it came from.
///
/// # Errors
///
/// [`TestError::EmptySample`] when the pool holds no observations.
pub fn pooled_ranks(samples: &[&[f64]]) -> Result<Vec<RankedObservation>> {
    let mut pool: Vec<(f64, usize)> = samples
        .iter()
        .enumerate()
        .flat_map(|(s, values)| values.iter().map(move |&v| (v, s)))
        .collect();
    if pool.is_empty() {
        return Err(TestError::EmptySample);
    }

    pool.sort_by(|a, b| total_cmp(a.0, b.0));
    let ranks = tied_ranks(pool.iter().map(|p| p.0));

    Ok(pool
        .into_iter()
        .zip(ranks)
        .map(|((value, sample), rank)| RankedObservation {
            value,
            sample,
            rank,
        })
        .collect())
}

/// Ranks |d| over non-zero differences, keeping the sign of each.
///
/// Zero differences must already be removed; they would be ranked as
/// negatives otherwise. Output is in ascending magnitude order.
///
/// # Errors
///
/// [`TestError::EmptySample`] when `differences` is empty.
pub fn signed_ranks(differences: &[f64]) -> Result<Vec<SignedRank>> {
    if differences.is_empty() {
        return Err(TestError::EmptySample);
    }

    let mut mags: Vec<(f64, bool)> = differences.iter().map(|&d| (d.abs(), d > 0.0)).collect();
    mags.sort_by(|a, b| total_cmp(a.0, b.0));
    let ranks = tied_ranks(mags.iter().map(|m| m.0));

    Ok(mags
        .into_iter()
        .zip(ranks)
        .map(|((magnitude, positive), rank)| SignedRank {
            magnitude,
            positive,
            rank,
        })
        .collect())
}

// Stable sorts need a total order; callers reject NaN before ranking.
fn total_cmp(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

// Midranks for an already sorted sequence. Positions i..j are tied when
// their values compare equal; each gets (i+1 + j) / 2.
fn tied_ranks(sorted: impl Iterator<Item = f64>) -> Vec<f64> {
    let sorted: Vec<f64> = sorted.collect();
    let n = sorted.len();
    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && sorted[j] == sorted[i] {
            j += 1;
        }
        let avg_rank = (i + 1 + j) as f64 / 2.0;
        for rank in ranks.iter_mut().take(j).skip(i) {
            *rank = avg_rank;
        }
        i = j;
    }
    ranks
}
