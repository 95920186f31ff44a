use serde::Serialize;

use super::error::ResupplyError;

/// Tolerance used when checking that the two weights are complementary.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Flood-risk (`alpha`) and carbon (`beta`) weighting coefficients.
///
/// The pair always sums to one: each setter re-derives the other coefficient, and there is no way
/// to set both independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreWeights {
    alpha: f64,
    beta: f64,
}

impl Default for ScoreWeights {
    /// Biased toward flood-risk avoidance.
    fn default() -> Self {
        Self {
            alpha: 0.6,
            beta: 0.4,
        }
    }
}

impl ScoreWeights {
    pub fn from_alpha(alpha: f64) -> Result<Self, ResupplyError> {
        let mut weights = Self::default();
        weights.set_alpha(alpha)?;
        Ok(weights)
    }

    pub fn from_beta(beta: f64) -> Result<Self, ResupplyError> {
        let mut weights = Self::default();
        weights.set_beta(beta)?;
        Ok(weights)
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    pub fn set_alpha(&mut self, alpha: f64) -> Result<(), ResupplyError> {
        let alpha = validate(alpha)?;
        self.alpha = alpha;
        self.beta = 1.0 - alpha;
        Ok(())
    }

    pub fn set_beta(&mut self, beta: f64) -> Result<(), ResupplyError> {
        let beta = validate(beta)?;
        self.beta = beta;
        self.alpha = 1.0 - beta;
        Ok(())
    }

    /// Reconcile a caller supplying both coefficients; they must already be complementary.
    pub fn from_pair(alpha: f64, beta: f64) -> Result<Self, ResupplyError> {
        let weights = Self::from_alpha(alpha)?;
        validate(beta)?;
        if (weights.beta - beta).abs() > WEIGHT_TOLERANCE {
            return Err(ResupplyError::InvalidWeight { value: beta });
        }
        Ok(weights)
    }
}

fn validate(value: f64) -> Result<f64, ResupplyError> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(ResupplyError::InvalidWeight { value })
    }
}
