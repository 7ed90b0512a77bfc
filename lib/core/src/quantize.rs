//! Budgeted sparsification and quantization of raw weight vectors.
//!
//! A trained topic model emits real-valued weight vectors (document-topic
//! "thetas", topic-word "betas"). Before indexing they are reduced to a
//! compact sparse integer form: entries below a relative threshold are
//! dropped, the survivors are rescaled to non-negative integers summing to
//! exactly the configured budget. The operation is deterministic, so
//! re-running inference on the same input reproduces the same stored vector.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::{Error, Result};

/// A precision budget: relative drop threshold plus the exact integer sum
/// the quantized vector must reach.
///
/// Thetas, betas and neural-model vectors each carry their own budget; the
/// contract is identical, only the numbers differ.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct QuantBudget {
    /// Entries below `threshold * sum(raw)` are discarded before rescaling.
    pub threshold: f64,
    /// Quantized weights sum to exactly this value (unless all entries drop).
    pub max_sum: u32,
}

impl QuantBudget {
    pub fn new(threshold: f64, max_sum: u32) -> Result<Self> {
        let budget = Self { threshold, max_sum };
        budget.validate()?;
        Ok(budget)
    }

    /// Rejects bad budgets at load time, before any vector is processed.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(Error::InvalidBudget(format!(
                "threshold must be a non-negative finite number, got {}",
                self.threshold
            )));
        }
        if self.max_sum == 0 {
            return Err(Error::InvalidBudget(
                "max_sum must be strictly positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sparsify and quantize a raw weight vector under the given budget.
///
/// Returns `(index, weight)` pairs sorted by ascending index with strictly
/// positive weights summing to exactly `budget.max_sum`, or an empty vector
/// when every entry falls below the threshold (a valid terminal state).
///
/// Integer allocation uses the largest-remainder method; rounding ties are
/// broken by descending original weight, then ascending index.
pub fn sparsify_quantize(raw: &[f64], budget: &QuantBudget) -> Result<Vec<(u32, u32)>> {
    budget.validate()?;

    let mut total = 0.0;
    for (index, &weight) in raw.iter().enumerate() {
        if !weight.is_finite() {
            return Err(Error::MalformedVector(format!(
                "non-finite weight at index {index}"
            )));
        }
        if weight < 0.0 {
            return Err(Error::NegativeWeight { index, weight });
        }
        total += weight;
    }
    if total <= 0.0 {
        return Ok(Vec::new());
    }

    let cut = budget.threshold * total;
    let kept: SmallVec<[(usize, f64); 32]> = raw
        .iter()
        .copied()
        .enumerate()
        .filter(|&(_, w)| w > 0.0 && w >= cut)
        .collect();
    if kept.is_empty() {
        return Ok(Vec::new());
    }

    let kept_total: f64 = kept.iter().map(|&(_, w)| w).sum();
    let target = u64::from(budget.max_sum);

    let mut weights: Vec<u64> = Vec::with_capacity(kept.len());
    // (slot in `kept`, fractional part, original weight)
    let mut remainders: Vec<(usize, f64, f64)> = Vec::with_capacity(kept.len());
    let mut allocated: u64 = 0;
    for (slot, &(_, weight)) in kept.iter().enumerate() {
        let quota = weight / kept_total * target as f64;
        let base = quota.floor() as u64;
        weights.push(base);
        remainders.push((slot, quota - base as f64, weight));
        allocated += base;
    }

    match allocated.cmp(&target) {
        Ordering::Less => {
            remainders.sort_by(|a, b| {
                OrderedFloat(b.1)
                    .cmp(&OrderedFloat(a.1))
                    .then(OrderedFloat(b.2).cmp(&OrderedFloat(a.2)))
                    .then(kept[a.0].0.cmp(&kept[b.0].0))
            });
            let mut deficit = (target - allocated) as usize;
            let mut i = 0;
            while deficit > 0 {
                let slot = remainders[i % remainders.len()].0;
                weights[slot] += 1;
                deficit -= 1;
                i += 1;
            }
        }
        Ordering::Greater => {
            // Floor of an accumulated float quota can land one unit high;
            // take the surplus back from the smallest remainders first.
            remainders.sort_by(|a, b| {
                OrderedFloat(a.1)
                    .cmp(&OrderedFloat(b.1))
                    .then(OrderedFloat(a.2).cmp(&OrderedFloat(b.2)))
                    .then(kept[b.0].0.cmp(&kept[a.0].0))
            });
            let mut surplus = (allocated - target) as usize;
            let mut i = 0;
            while surplus > 0 {
                let slot = remainders[i % remainders.len()].0;
                if weights[slot] > 0 {
                    weights[slot] -= 1;
                    surplus -= 1;
                }
                i += 1;
            }
        }
        Ordering::Equal => {}
    }

    Ok(kept
        .iter()
        .zip(weights)
        .filter(|&(_, w)| w > 0)
        .map(|(&(index, _), w)| (index as u32, w as u32))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sum(entries: &[(u32, u32)]) -> u64 {
        entries.iter().map(|&(_, w)| u64::from(w)).sum()
    }

    #[test]
    fn test_exact_sum() {
        let budget = QuantBudget::new(0.0, 1000).unwrap();
        let entries = sparsify_quantize(&[0.1, 0.3, 0.6], &budget).unwrap();
        assert_eq!(sum(&entries), 1000);
        assert_eq!(entries, vec![(0, 100), (1, 300), (2, 600)]);
    }

    #[test]
    fn test_threshold_drops_small_entries() {
        let budget = QuantBudget::new(0.05, 1000).unwrap();
        // 0.01 / 1.0 is below the 5% relative threshold.
        let entries = sparsify_quantize(&[0.01, 0.49, 0.5], &budget).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, 1);
        assert_eq!(sum(&entries), 1000);
    }

    #[test]
    fn test_all_dropped_is_empty_not_error() {
        let budget = QuantBudget::new(0.5, 1000).unwrap();
        // Four equal weights, each 25% of the total, all below 50%.
        let entries = sparsify_quantize(&[1.0, 1.0, 1.0, 1.0], &budget).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_zero_vector_is_empty() {
        let budget = QuantBudget::new(0.003, 1000).unwrap();
        assert!(sparsify_quantize(&[0.0, 0.0], &budget).unwrap().is_empty());
        assert!(sparsify_quantize(&[], &budget).unwrap().is_empty());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let budget = QuantBudget::new(0.0, 1000).unwrap();
        let err = sparsify_quantize(&[0.5, -0.1], &budget).unwrap_err();
        assert!(matches!(err, Error::NegativeWeight { index: 1, .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_bad_budget_rejected() {
        assert!(QuantBudget::new(-0.1, 1000).is_err());
        assert!(QuantBudget::new(0.1, 0).is_err());
        assert!(QuantBudget::new(f64::NAN, 1000).is_err());
    }

    #[test]
    fn test_rounding_ties_are_deterministic() {
        let budget = QuantBudget::new(0.0, 10).unwrap();
        // Three equal weights cannot split 10 evenly; the leftover unit goes
        // to the lowest index.
        let entries = sparsify_quantize(&[1.0, 1.0, 1.0], &budget).unwrap();
        assert_eq!(entries, vec![(0, 4), (1, 3), (2, 3)]);
        for _ in 0..10 {
            assert_eq!(sparsify_quantize(&[1.0, 1.0, 1.0], &budget).unwrap(), entries);
        }
    }

    #[test]
    fn test_remainder_goes_to_heavier_weight() {
        let budget = QuantBudget::new(0.0, 3).unwrap();
        // Quotas 1.8 and 1.2: floors 1 + 1, leftover unit to the larger
        // fractional part (the heavier entry).
        let entries = sparsify_quantize(&[0.6, 0.4], &budget).unwrap();
        assert_eq!(entries, vec![(0, 2), (1, 1)]);
    }

    #[test]
    fn test_more_entries_than_budget() {
        let budget = QuantBudget::new(0.0, 3).unwrap();
        let raw: Vec<f64> = (0..10).map(|i| 1.0 + i as f64 * 1e-6).collect();
        let entries = sparsify_quantize(&raw, &budget).unwrap();
        assert_eq!(sum(&entries), 3);
        // Zero-weight survivors are dropped from the sparse form.
        assert!(entries.iter().all(|&(_, w)| w > 0));
    }

    #[test]
    fn test_threshold_monotonicity() {
        let budget_tight = QuantBudget::new(0.2, 100).unwrap();
        let budget_loose = QuantBudget::new(0.0, 100).unwrap();
        let raw = [0.05, 0.1, 0.15, 0.3, 0.4];
        let tight = sparsify_quantize(&raw, &budget_tight).unwrap();
        let loose = sparsify_quantize(&raw, &budget_loose).unwrap();
        // Lowering the threshold to zero never drops more entries.
        assert!(loose.len() >= tight.len());
        for (idx, _) in &tight {
            assert!(loose.iter().any(|(i, _)| i == idx));
        }
    }

    #[test]
    fn test_random_vectors_always_hit_budget() {
        use rand::Rng;
        let mut rng = rand::rng();
        let budget = QuantBudget::new(0.003, 1000).unwrap();
        for _ in 0..200 {
            let len = rng.random_range(1..50);
            let raw: Vec<f64> = (0..len).map(|_| rng.random_range(0.0..1.0)).collect();
            let entries = sparsify_quantize(&raw, &budget).unwrap();
            assert!(entries.is_empty() || sum(&entries) == 1000);
            // Sorted by ascending topic index, unique.
            assert!(entries.windows(2).all(|w| w[0].0 < w[1].0));
        }
    }
}
