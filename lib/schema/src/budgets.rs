//! Process-wide numeric budgets.
//!
//! Loaded once at startup and immutable thereafter. Thetas, betas and
//! neural-embedding models each get their own quantization budget; the
//! neural budget is a distinct, explicitly selected pair and is never
//! substituted for the classical ones.

use serde::{Deserialize, Serialize};
use topicx_core::{Error, QuantBudget, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GlobalBudgets {
    /// Relative threshold below which theta entries are dropped.
    pub thetas_thr: f64,
    /// Exact integer sum of a quantized theta vector.
    pub thetas_max_sum: u32,
    /// Exact integer sum of a quantized beta row.
    pub betas_max_sum: u32,
    /// Exact integer sum for vectors from neural (embedding-based) models.
    pub max_sum_neural_models: u32,
    /// Maximum number of documents per external inference call.
    pub batch_size: usize,
}

impl GlobalBudgets {
    pub fn validate(&self) -> Result<()> {
        self.theta_budget().validate()?;
        self.beta_budget().validate()?;
        self.neural_budget().validate()?;
        if self.batch_size == 0 {
            return Err(Error::InvalidBudget(
                "batch_size must be strictly positive".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn theta_budget(&self) -> QuantBudget {
        QuantBudget {
            threshold: self.thetas_thr,
            max_sum: self.thetas_max_sum,
        }
    }

    /// Beta rows share the theta threshold; only the sum differs.
    #[inline]
    #[must_use]
    pub fn beta_budget(&self) -> QuantBudget {
        QuantBudget {
            threshold: self.thetas_thr,
            max_sum: self.betas_max_sum,
        }
    }

    #[inline]
    #[must_use]
    pub fn neural_budget(&self) -> QuantBudget {
        QuantBudget {
            threshold: self.thetas_thr,
            max_sum: self.max_sum_neural_models,
        }
    }
}

impl Default for GlobalBudgets {
    fn default() -> Self {
        Self {
            thetas_thr: 3e-3,
            thetas_max_sum: 1000,
            betas_max_sum: 1000,
            max_sum_neural_models: 10_000,
            batch_size: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(GlobalBudgets::default().validate().is_ok());
    }

    #[test]
    fn test_zero_sum_rejected() {
        let budgets = GlobalBudgets {
            thetas_max_sum: 0,
            ..Default::default()
        };
        assert!(matches!(budgets.validate(), Err(Error::InvalidBudget(_))));
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let budgets = GlobalBudgets {
            batch_size: 0,
            ..Default::default()
        };
        assert!(budgets.validate().is_err());
    }

    #[test]
    fn test_negative_threshold_rejected() {
        let budgets = GlobalBudgets {
            thetas_thr: -0.1,
            ..Default::default()
        };
        assert!(budgets.validate().is_err());
    }

    #[test]
    fn test_neural_budget_is_distinct() {
        let budgets = GlobalBudgets::default();
        assert_ne!(budgets.neural_budget(), budgets.theta_budget());
        assert_eq!(budgets.neural_budget().max_sum, 10_000);
    }

    #[test]
    fn test_serde_round_trip() {
        let budgets = GlobalBudgets::default();
        let json = serde_json::to_string(&budgets).unwrap();
        let back: GlobalBudgets = serde_json::from_str(&json).unwrap();
        assert_eq!(back, budgets);
    }
}
