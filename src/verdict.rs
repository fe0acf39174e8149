//! Decision against a critical value.
//!
//! Every test ends the same way: a statistic is compared to the critical
//! value of a reference distribution at α. [`Verdict`] records that
//! comparison so results can expose a uniform decision.

use crate::critical::{self, Distribution};
use crate::error::{Result, TestError};

/// Where the rejection region lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Tail {
    /// Reject when |statistic| > critical value.
    TwoSided,
    /// Reject when statistic > critical value.
    Upper,
}

/// Outcome of comparing a statistic with its critical value.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Verdict {
    pub statistic: f64,
    pub critical_value: f64,
    pub distribution: Distribution,
    pub tail: Tail,
    pub alpha: f64,
    /// `true` when the statistic falls in the rejection region.
    pub reject: bool,
    /// Tail probability of the statistic under H₀.
    pub p_value: f64,
}

impl Verdict {
    /// Looks up the critical value for `distribution` at α and decides.
    pub(crate) fn decide(
        statistic: f64,
        distribution: Distribution,
        tail: Tail,
        alpha: f64,
    ) -> Result<Self> {
        let critical_value = match tail {
            Tail::TwoSided => critical::two_tailed(distribution, alpha)?,
            Tail::Upper => critical::upper_tail(distribution, alpha)?,
        };
        Self::against(statistic, critical_value, distribution, tail, alpha)
    }

    /// Decides against a caller-provided critical value.
    pub(crate) fn against(
        statistic: f64,
        critical_value: f64,
        distribution: Distribution,
        tail: Tail,
        alpha: f64,
    ) -> Result<Self> {
        if !statistic.is_finite() {
            return Err(TestError::NonFiniteStatistic("test statistic"));
        }
        let (reject, p_value) = match tail {
            Tail::TwoSided => (
                statistic.abs() > critical_value,
                critical::two_tailed_p_value(distribution, statistic)?,
            ),
            Tail::Upper => (
                statistic > critical_value,
                critical::upper_tail_p_value(distribution, statistic)?,
            ),
        };
        Ok(Self {
            statistic,
            critical_value,
            distribution,
            tail,
            alpha,
            reject,
            p_value,
        })
    }

    /// Rejection region in the notation used by conclusions:
    /// `±1.960` for two-sided tests, `χ²(2) = 5.991` for upper-tail ones.
    pub fn region(&self) -> String {
        match self.tail {
            Tail::TwoSided => format!("±{:.3}", self.critical_value),
            Tail::Upper => format!("{} = {:.3}", self.distribution.label(), self.critical_value),
        }
    }

    /// Builds a conclusion sentence: `symbol` names the statistic, `reject`
    /// and `retain` describe what each outcome means for the data.
    pub(crate) fn conclude(&self, symbol: &str, reject: &str, retain: &str) -> String {
        if self.reject {
            format!(
                "At significance level {:.3}, the statistic {symbol} = {:.3} exceeds the critical value {}. {reject}",
                self.alpha,
                self.statistic,
                self.region()
            )
        } else {
            format!(
                "At significance level {:.3}, the statistic {symbol} = {:.3} lies outside the rejection region {}. {retain}",
                self.alpha,
                self.statistic,
                self.region()
            )
        }
    }
}
