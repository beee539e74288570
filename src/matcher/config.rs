use crate::{Error, Result};

/// Constant costs added to each kind of edit in the alignment recurrence, on top
/// of the squared interval magnitudes.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CostWeights {
    /// Added when a query interval is aligned with a reference interval (alpha).
    pub transposition: f32,
    /// Added when a query interval has no reference counterpart,
    /// e.g a note split in two by the pitch tracker (beta).
    pub duplication: f32,
    /// Added when a reference interval is skipped, e.g a note the pitch tracker missed (gamma).
    pub dropout: f32,
}

impl CostWeights {
    pub fn new(transposition: f32, duplication: f32, dropout: f32) -> Self {
        CostWeights {
            transposition,
            duplication,
            dropout,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let weights = [self.transposition, self.duplication, self.dropout];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::InvalidConfig(
                "cost weights must be finite and non-negative",
            ));
        }
        Ok(())
    }
}

impl Default for CostWeights {
    fn default() -> Self {
        CostWeights::new(0.0, 1.0, 1.0)
    }
}

/// Tuning parameters for [BeliefAggregator](struct.BeliefAggregator.html).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MatcherConfig {
    pub weights: CostWeights,
    /// Weight of the previous belief when blending in new evidence, in `[0, 1)`.
    /// Higher values need more consistent evidence before a song dominates,
    /// lower values react faster but are more sensitive to tracking errors.
    pub smoothing: f32,
    /// The cost per received interval of the catch-all "no match" hypothesis.
    /// A song whose alignment cost grows faster than this per note
    /// loses probability to the catch-all.
    pub no_match_unit_cost: f32,
}

impl MatcherConfig {
    pub fn new() -> Self {
        MatcherConfig::default()
    }

    pub fn from_options(weights: CostWeights, smoothing: f32, no_match_unit_cost: f32) -> Self {
        MatcherConfig {
            weights,
            smoothing,
            no_match_unit_cost,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if !(self.smoothing >= 0.0 && self.smoothing < 1.0) {
            return Err(Error::InvalidConfig("smoothing must be in [0, 1)"));
        }
        if !(self.no_match_unit_cost > 0.0 && self.no_match_unit_cost.is_finite()) {
            return Err(Error::InvalidConfig(
                "no match unit cost must be positive and finite",
            ));
        }
        Ok(())
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        MatcherConfig::from_options(CostWeights::default(), 0.6, 2.0)
    }
}
