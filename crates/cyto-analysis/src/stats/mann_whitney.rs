//! Two-sided Mann–Whitney U test for two independent samples.
//!
//! # Method selection
//!
//! - **Exact**: the smaller sample has at most [`EXACT_MAX_SIZE`] values and
//!   the pooled data has no ties. The p-value comes from the exact null
//!   distribution of U.
//! - **Asymptotic**: otherwise. Normal approximation with tie correction
//!   and continuity correction.
//!
//! In both cases `U = max(U1, n1*n2 - U1)` and the two-sided p-value is
//! `2 * P(U' >= U)`, clipped to 1.

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use statrs::function::factorial::binomial;

use crate::error::StatsError;

/// Largest smaller-group size for which the exact distribution is used.
pub const EXACT_MAX_SIZE: usize = 8;

/// How the p-value was computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestMethod {
    Exact,
    Asymptotic,
}

/// Result of a two-sided Mann–Whitney U test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyResult {
    /// U statistic of the first sample.
    pub u_statistic: f64,
    /// Two-sided p-value.
    pub p_value: f64,
    pub method: TestMethod,
    pub n_x: usize,
    pub n_y: usize,
}

impl MannWhitneyResult {
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}

/// Run a two-sided Mann–Whitney U test of `x` against `y`.
pub fn mann_whitney_u(x: &[f64], y: &[f64]) -> Result<MannWhitneyResult, StatsError> {
    check_group(x, "first")?;
    check_group(y, "second")?;

    let n_x = x.len();
    let n_y = y.len();
    let ranking = rank_pooled(x, y);
    let rank_sum_x: f64 = ranking.ranks[..n_x].iter().sum();
    let n1 = n_x as f64;
    let n2 = n_y as f64;
    let u1 = rank_sum_x - n1 * (n1 + 1.0) / 2.0;
    let u = u1.max(n1 * n2 - u1);

    let (method, p_value) = if n_x.min(n_y) <= EXACT_MAX_SIZE && !ranking.has_ties() {
        (TestMethod::Exact, exact_p_value(u, n_x, n_y))
    } else {
        (
            TestMethod::Asymptotic,
            asymptotic_p_value(u, n_x, n_y, ranking.tie_term())?,
        )
    };

    Ok(MannWhitneyResult {
        u_statistic: u1,
        p_value: p_value.clamp(0.0, 1.0),
        method,
        n_x,
        n_y,
    })
}

fn check_group(values: &[f64], group: &'static str) -> Result<(), StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyGroup { group });
    }
    if values.iter().any(|value| !value.is_finite()) {
        return Err(StatsError::NonFinite { group });
    }
    Ok(())
}

/// Average ranks of the pooled sample plus the sizes of tied groups.
struct Ranking {
    /// Ranks in input order: `x` values first, then `y`.
    ranks: Vec<f64>,
    tie_sizes: Vec<usize>,
}

impl Ranking {
    fn has_ties(&self) -> bool {
        !self.tie_sizes.is_empty()
    }

    /// Σ(t³ - t) over tied groups.
    fn tie_term(&self) -> f64 {
        self.tie_sizes
            .iter()
            .map(|&t| {
                let t = t as f64;
                t * t * t - t
            })
            .sum()
    }
}

fn rank_pooled(x: &[f64], y: &[f64]) -> Ranking {
    let pooled: Vec<f64> = x.iter().chain(y).copied().collect();
    let mut order: Vec<usize> = (0..pooled.len()).collect();
    order.sort_by(|&a, &b| pooled[a].total_cmp(&pooled[b]));

    let mut ranks = vec![0.0; pooled.len()];
    let mut tie_sizes = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start;
        while end + 1 < order.len() && pooled[order[end + 1]] == pooled[order[start]] {
            end += 1;
        }
        // Ranks are 1-based; tied values share the mean of their positions.
        let rank = (start + end) as f64 / 2.0 + 1.0;
        for &idx in &order[start..=end] {
            ranks[idx] = rank;
        }
        let size = end - start + 1;
        if size > 1 {
            tie_sizes.push(size);
        }
        start = end + 1;
    }
    Ranking { ranks, tie_sizes }
}

fn exact_p_value(u: f64, n_x: usize, n_y: usize) -> f64 {
    let counts = exact_null_counts(n_x.min(n_y), n_x.max(n_y));
    let total = binomial((n_x + n_y) as u64, n_x.min(n_y) as u64);
    // Without ties U is integral and at least m*n/2. The null distribution is
    // symmetric, so P(U' >= U) is read from the exactly computed lower tail.
    let threshold = u.round() as usize;
    let mirrored = (counts.len() - 1).saturating_sub(threshold);
    let tail: f64 = counts[..=mirrored].iter().sum();
    2.0 * tail / total
}

/// Number of group arrangements producing each value of U, for sizes `m <= n`.
///
/// The counts are the coefficients of the Gaussian binomial `[m+n choose m]`,
/// built as the product of `(1 - q^(n+i)) / (1 - q^i)` for `i = 1..=m` over a
/// single array truncated at degree `m*n`.
fn exact_null_counts(m: usize, n: usize) -> Vec<f64> {
    let len = m * n + 1;
    let mut counts = vec![0.0; len];
    counts[0] = 1.0;
    for i in 1..=m {
        let shift = n + i;
        for u in (shift..len).rev() {
            counts[u] -= counts[u - shift];
        }
        for u in i..len {
            counts[u] += counts[u - i];
        }
    }
    counts
}

fn asymptotic_p_value(u: f64, n_x: usize, n_y: usize, tie_term: f64) -> Result<f64, StatsError> {
    let n1 = n_x as f64;
    let n2 = n_y as f64;
    let n = n1 + n2;
    let mean = n1 * n2 / 2.0;
    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        // Every pooled value is identical.
        return Ok(1.0);
    }
    let z = (u - mean - 0.5) / variance.sqrt();
    let normal =
        Normal::new(0.0, 1.0).map_err(|err| StatsError::Distribution(err.to_string()))?;
    Ok(2.0 * normal.sf(z))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn exact_fully_separated() {
        let result = mann_whitney_u(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
        assert_eq!(result.method, TestMethod::Exact);
        assert_close(result.u_statistic, 0.0, 1e-12);
        assert_close(result.p_value, 0.1, 1e-12);
    }

    #[test]
    fn exact_unequal_sizes() {
        let result =
            mann_whitney_u(&[1.5, 3.2, 0.4, 2.2], &[5.1, 4.4, 2.5, 6.0, 7.3]).unwrap();
        assert_eq!(result.method, TestMethod::Exact);
        assert_close(result.u_statistic, 1.0, 1e-12);
        assert_close(result.p_value, 2.0 / 63.0, 1e-12);
    }

    #[test]
    fn exact_interleaved_is_not_significant() {
        let result =
            mann_whitney_u(&[10.0, 20.0, 30.0, 40.0, 50.0], &[15.0, 25.0, 35.0]).unwrap();
        assert_close(result.u_statistic, 9.0, 1e-12);
        assert_close(result.p_value, 0.785_714_285_714_285_7, 1e-9);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn ties_force_asymptotic_with_correction() {
        let result = mann_whitney_u(&[1.0, 2.0, 2.0, 3.0], &[2.0, 4.0, 5.0]).unwrap();
        assert_eq!(result.method, TestMethod::Asymptotic);
        assert_close(result.u_statistic, 2.0, 1e-12);
        assert_close(result.p_value, 0.199_089_852_148_204_57, 1e-6);
    }

    #[test]
    fn large_groups_use_normal_approximation() {
        let x: Vec<f64> = (1..=10).map(f64::from).collect();
        let y: Vec<f64> = (11..=20).map(f64::from).collect();
        let result = mann_whitney_u(&x, &y).unwrap();
        assert_eq!(result.method, TestMethod::Asymptotic);
        assert_close(result.p_value, 1.826_717_911_095_504e-4, 1e-7);
        assert!(result.is_significant(0.05));
    }

    #[test]
    fn symmetric_in_group_order() {
        let x = [3.1, 4.7, 1.2, 8.8, 5.0];
        let y = [2.2, 9.1, 7.4];
        let forward = mann_whitney_u(&x, &y).unwrap();
        let backward = mann_whitney_u(&y, &x).unwrap();
        assert_close(forward.p_value, backward.p_value, 1e-12);
        assert_close(
            forward.u_statistic + backward.u_statistic,
            (x.len() * y.len()) as f64,
            1e-12,
        );
    }

    #[test]
    fn all_tied_gives_unit_p_value() {
        let result = mann_whitney_u(&[2.0, 2.0, 2.0], &[2.0, 2.0]).unwrap();
        assert_close(result.p_value, 1.0, 1e-12);
    }

    #[test]
    fn exact_counts_sum_to_binomial() {
        let counts = exact_null_counts(3, 5);
        assert_eq!(counts.len(), 16);
        assert_close(counts.iter().sum::<f64>(), 56.0, 1e-9);
        // Symmetric around m*n/2.
        for u in 0..counts.len() {
            assert_close(counts[u], counts[counts.len() - 1 - u], 1e-9);
        }
    }

    #[test]
    fn exact_counts_small_case() {
        assert_eq!(exact_null_counts(2, 2), vec![1.0, 1.0, 2.0, 1.0, 1.0]);
        assert_eq!(exact_null_counts(1, 3), vec![1.0; 4]);
    }

    #[test]
    fn exact_handles_long_second_group() {
        let x: Vec<f64> = (0..8).map(|i| f64::from(i) + 0.5).collect();
        let y: Vec<f64> = (0..3000).map(|i| f64::from(i) + 1000.0).collect();
        let result = mann_whitney_u(&x, &y).unwrap();
        assert_eq!(result.method, TestMethod::Exact);
        assert_close(result.u_statistic, 0.0, 1e-12);
        let expected = 2.0 / binomial(3008, 8);
        assert!((result.p_value / expected - 1.0).abs() < 1e-9);

        let counts = exact_null_counts(8, 3000);
        assert_eq!(counts.len(), 24_001);
        assert_eq!(counts[1], 1.0);
        assert_eq!(counts[2], 2.0);
    }

    #[test]
    fn rejects_empty_and_non_finite_groups() {
        assert_eq!(
            mann_whitney_u(&[], &[1.0]).unwrap_err(),
            StatsError::EmptyGroup { group: "first" }
        );
        assert_eq!(
            mann_whitney_u(&[1.0], &[f64::NAN]).unwrap_err(),
            StatsError::NonFinite { group: "second" }
        );
    }
}
