//! Distributional similarity between sparse topic vectors.
//!
//! All functions here are pure and run against two vectors at a time, so
//! they are unit-testable outside any cluster runtime and usable as the
//! query-time scoring extension. Each vector is treated as a discrete
//! probability distribution over the model's topics, with implicit zero
//! weight for absent topics.
//!
//! Comparing vectors from different models is rejected: divergence is only
//! meaningful within one model's topic space. An empty vector is the zero
//! distribution and sits at maximum divergence from any non-empty vector;
//! it is never a computation error.

use serde::{Deserialize, Serialize};
use topicx_core::{Error, Result, SparseTopicVector};

/// Upper bound of the natural-log Jensen-Shannon divergence.
pub const MAX_JS_DIVERGENCE: f64 = std::f64::consts::LN_2;

fn same_model(p: &SparseTopicVector, q: &SparseTopicVector) -> Result<()> {
    if p.model_id() != q.model_id() {
        return Err(Error::ModelMismatch {
            expected: p.model_id().to_string(),
            actual: q.model_id().to_string(),
        });
    }
    Ok(())
}

/// Merge-walk over the union of two sorted sparse entry lists, yielding
/// `(weight in p, weight in q)` for every topic present in either.
struct Merged<'a> {
    a: &'a [(u32, u32)],
    b: &'a [(u32, u32)],
    i: usize,
    j: usize,
}

impl Iterator for Merged<'_> {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<(u32, u32)> {
        match (self.a.get(self.i), self.b.get(self.j)) {
            (Some(&(ta, wa)), Some(&(tb, wb))) => {
                if ta < tb {
                    self.i += 1;
                    Some((wa, 0))
                } else if tb < ta {
                    self.j += 1;
                    Some((0, wb))
                } else {
                    self.i += 1;
                    self.j += 1;
                    Some((wa, wb))
                }
            }
            (Some(&(_, wa)), None) => {
                self.i += 1;
                Some((wa, 0))
            }
            (None, Some(&(_, wb))) => {
                self.j += 1;
                Some((0, wb))
            }
            (None, None) => None,
        }
    }
}

fn merged<'a>(p: &'a SparseTopicVector, q: &'a SparseTopicVector) -> Merged<'a> {
    Merged {
        a: p.entries(),
        b: q.entries(),
        i: 0,
        j: 0,
    }
}

/// Jensen-Shannon divergence, natural log, bounded in `[0, ln 2]`.
///
/// Symmetric; zero iff the vectors are identical after normalization.
pub fn js_divergence(p: &SparseTopicVector, q: &SparseTopicVector) -> Result<f64> {
    same_model(p, q)?;
    match (p.is_empty(), q.is_empty()) {
        (true, true) => return Ok(0.0),
        (true, false) | (false, true) => return Ok(MAX_JS_DIVERGENCE),
        (false, false) => {}
    }

    let sum_p = p.sum() as f64;
    let sum_q = q.sum() as f64;
    let mut acc = 0.0;
    for (wp, wq) in merged(p, q) {
        let pi = f64::from(wp) / sum_p;
        let qi = f64::from(wq) / sum_q;
        let mid = 0.5 * (pi + qi);
        if pi > 0.0 {
            acc += 0.5 * pi * (pi / mid).ln();
        }
        if qi > 0.0 {
            acc += 0.5 * qi * (qi / mid).ln();
        }
    }
    // Float accumulation can stray a hair outside the theoretical bounds.
    Ok(acc.clamp(0.0, MAX_JS_DIVERGENCE))
}

/// Similarity transform of [`js_divergence`]: `1 - divergence / ln 2`,
/// in `[0, 1]`, higher is better, so standard ranking applies unchanged.
pub fn js_similarity(p: &SparseTopicVector, q: &SparseTopicVector) -> Result<f64> {
    Ok(1.0 - js_divergence(p, q)? / MAX_JS_DIVERGENCE)
}

/// Hellinger distance with the `1/sqrt(2)` normalization, bounded in
/// `[0, 1]`. An empty side is at maximum distance from a non-empty one.
pub fn hellinger_distance(p: &SparseTopicVector, q: &SparseTopicVector) -> Result<f64> {
    same_model(p, q)?;
    match (p.is_empty(), q.is_empty()) {
        (true, true) => return Ok(0.0),
        (true, false) | (false, true) => return Ok(1.0),
        (false, false) => {}
    }

    let sum_p = p.sum() as f64;
    let sum_q = q.sum() as f64;
    let mut acc = 0.0;
    for (wp, wq) in merged(p, q) {
        let d = (f64::from(wp) / sum_p).sqrt() - (f64::from(wq) / sum_q).sqrt();
        acc += d * d;
    }
    Ok((acc.sqrt() / std::f64::consts::SQRT_2).clamp(0.0, 1.0))
}

/// Bhattacharyya coefficient, bounded in `[0, 1]`, already a similarity:
/// 1 for identical distributions, 0 for disjoint support.
pub fn bhattacharyya_coefficient(p: &SparseTopicVector, q: &SparseTopicVector) -> Result<f64> {
    same_model(p, q)?;
    match (p.is_empty(), q.is_empty()) {
        (true, true) => return Ok(1.0),
        (true, false) | (false, true) => return Ok(0.0),
        (false, false) => {}
    }

    let sum_p = p.sum() as f64;
    let sum_q = q.sum() as f64;
    let mut acc = 0.0;
    for (wp, wq) in merged(p, q) {
        if wp > 0 && wq > 0 {
            acc += (f64::from(wp) / sum_p * f64::from(wq) / sum_q).sqrt();
        }
    }
    Ok(acc.clamp(0.0, 1.0))
}

/// Which distributional measure backs a similarity score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Divergence {
    /// `1 - JSD / ln 2` (the default scoring extension).
    #[default]
    JensenShannon,
    /// `1 - normalized Hellinger distance`.
    Hellinger,
    /// Bhattacharyya coefficient.
    Bhattacharyya,
}

impl Divergence {
    /// Similarity in `[0, 1]`, higher is better, under the selected measure.
    pub fn similarity(&self, p: &SparseTopicVector, q: &SparseTopicVector) -> Result<f64> {
        match self {
            Divergence::JensenShannon => js_similarity(p, q),
            Divergence::Hellinger => Ok(1.0 - hellinger_distance(p, q)?),
            Divergence::Bhattacharyya => bhattacharyya_coefficient(p, q),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(entries: Vec<(u32, u32)>) -> SparseTopicVector {
        SparseTopicVector::new("mallet-25", entries).unwrap()
    }

    #[test]
    fn test_self_divergence_is_zero() {
        let p = vector(vec![(0, 700), (3, 300)]);
        assert!(js_divergence(&p, &p).unwrap() < 1e-12);
        assert!((js_similarity(&p, &p).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_symmetry() {
        let p = vector(vec![(0, 700), (3, 300)]);
        let q = vector(vec![(0, 100), (5, 900)]);
        let pq = js_divergence(&p, &q).unwrap();
        let qp = js_divergence(&q, &p).unwrap();
        assert_eq!(pq, qp);
        assert!(pq > 0.0 && pq < MAX_JS_DIVERGENCE);
    }

    #[test]
    fn test_disjoint_support_is_max_divergence() {
        let p = vector(vec![(0, 1000)]);
        let q = vector(vec![(1, 1000)]);
        assert!((js_divergence(&p, &q).unwrap() - MAX_JS_DIVERGENCE).abs() < 1e-12);
        assert!(js_similarity(&p, &q).unwrap().abs() < 1e-12);
    }

    #[test]
    fn test_empty_vs_nonempty_is_max() {
        let p = vector(vec![(4, 1000)]);
        let empty = SparseTopicVector::empty("mallet-25");
        assert_eq!(js_divergence(&p, &empty).unwrap(), MAX_JS_DIVERGENCE);
        assert_eq!(js_divergence(&empty, &p).unwrap(), MAX_JS_DIVERGENCE);
        assert_eq!(hellinger_distance(&p, &empty).unwrap(), 1.0);
        assert_eq!(bhattacharyya_coefficient(&p, &empty).unwrap(), 0.0);
    }

    #[test]
    fn test_empty_vs_empty_is_identical() {
        let a = SparseTopicVector::empty("m");
        let b = SparseTopicVector::empty("m");
        assert_eq!(js_divergence(&a, &b).unwrap(), 0.0);
        assert_eq!(Divergence::Bhattacharyya.similarity(&a, &b).unwrap(), 1.0);
    }

    #[test]
    fn test_cross_model_rejected() {
        let p = SparseTopicVector::new("mallet-25", vec![(0, 10)]).unwrap();
        let q = SparseTopicVector::new("mallet-40", vec![(0, 10)]).unwrap();
        let err = js_divergence(&p, &q).unwrap_err();
        assert!(matches!(err, Error::ModelMismatch { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_normalization_invariance() {
        // Same shape at different budgets normalizes to the same distribution.
        let p = vector(vec![(0, 70), (3, 30)]);
        let q = vector(vec![(0, 700), (3, 300)]);
        assert!(js_divergence(&p, &q).unwrap() < 1e-12);
    }

    #[test]
    fn test_hellinger_identical_and_disjoint() {
        let p = vector(vec![(0, 500), (1, 500)]);
        assert!(hellinger_distance(&p, &p).unwrap() < 1e-12);
        let q = vector(vec![(2, 1000)]);
        assert!((hellinger_distance(&p, &q).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bhattacharyya_identical() {
        let p = vector(vec![(0, 250), (1, 750)]);
        assert!((bhattacharyya_coefficient(&p, &p).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_divergence_enum_default_is_js() {
        assert_eq!(Divergence::default(), Divergence::JensenShannon);
        let json = serde_json::to_string(&Divergence::JensenShannon).unwrap();
        assert_eq!(json, "\"jensen_shannon\"");
    }
}
