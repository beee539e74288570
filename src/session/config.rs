use micromath::F32Ext;

use crate::matcher::MatcherConfig;
use crate::melody::DEFAULT_SAME_THRESHOLD;
use crate::{Error, Result};

/// How the interval between two detected notes is rounded before matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IntervalQuantization {
    /// Use the raw interval.
    None,
    /// Round towards zero to a whole number of semitones.
    Truncate,
    /// Round to the nearest whole number of semitones.
    Round,
}

impl IntervalQuantization {
    pub fn apply(self, interval: f32) -> f32 {
        match self {
            IntervalQuantization::None => interval,
            IntervalQuantization::Truncate => F32Ext::trunc(interval),
            IntervalQuantization::Round => F32Ext::round(interval),
        }
    }
}

/// The alphabet notes are matched in.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchMode {
    /// Match (quantized) intervals in semitones.
    Intervals,
    /// Match only the direction of each interval, see [Contour](../melody/enum.Contour.html).
    /// Intervals within the given number of semitones count as repeated notes.
    /// Reference melodies are converted to contours when the session is created.
    /// Tempo and start offset estimates work as usual, but the key difference
    /// is meaningless since the aligned symbols are no longer pitches.
    Contour(f32),
}

impl MatchMode {
    pub fn contour() -> Self {
        MatchMode::Contour(DEFAULT_SAME_THRESHOLD)
    }
}

impl Default for MatchMode {
    fn default() -> Self {
        MatchMode::Intervals
    }
}

/// Tuning parameters for a [ListeningSession](struct.ListeningSession.html).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SessionConfig {
    pub matcher: MatcherConfig,
    /// A song is considered identified once its belief exceeds this value.
    pub confidence_threshold: f32,
    /// The session restarts if no note starts for this many seconds.
    pub silence_timeout: f32,
    /// Ignored in contour mode, where the raw interval is classified.
    pub quantization: IntervalQuantization,
    pub mode: MatchMode,
}

impl SessionConfig {
    pub fn new() -> Self {
        SessionConfig::default()
    }

    pub fn from_options(
        matcher: MatcherConfig,
        confidence_threshold: f32,
        silence_timeout: f32,
        quantization: IntervalQuantization,
        mode: MatchMode,
    ) -> Self {
        SessionConfig {
            matcher,
            confidence_threshold,
            silence_timeout,
            quantization,
            mode,
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.matcher.validate()?;
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold < 1.0) {
            return Err(Error::InvalidConfig("confidence threshold must be in (0, 1)"));
        }
        if !(self.silence_timeout > 0.0) {
            return Err(Error::InvalidConfig("silence timeout must be positive"));
        }
        if let MatchMode::Contour(same_threshold) = self.mode {
            if !(same_threshold.is_finite() && same_threshold >= 0.0) {
                return Err(Error::InvalidConfig(
                    "contour threshold must be finite and non-negative",
                ));
            }
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::from_options(
            MatcherConfig::default(),
            0.8,
            3.0,
            IntervalQuantization::Truncate,
            MatchMode::Intervals,
        )
    }
}
