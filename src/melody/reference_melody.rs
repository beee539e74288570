use alloc::{boxed::Box, string::String, vec::Vec};

use crate::common::F32ArrayExt;
use crate::melody::contour::Contour;
use crate::melody::text::parse_values;
use crate::{Error, Result};

/// Pitch assumed for the first note of a reference melody when
/// absolute pitch information is unavailable. MIDI note 60 is middle C.
pub const DEFAULT_FIRST_PITCH: f32 = 60.0;

/// An immutable reference song.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceMelody {
    name: String,
    /// Signed semitone differences between consecutive notes.
    intervals: Box<[f32]>,
    /// Note start times in seconds. Contains one more element than `intervals`.
    onsets: Box<[f32]>,
    /// Pitch of the first note in semitones.
    first_pitch: f32,
}

impl ReferenceMelody {
    /// Creates a validated reference melody.
    ///
    /// # Arguments
    ///
    /// * `name` - A name identifying the song.
    /// * `intervals` - Signed semitone differences between consecutive notes. Must not be empty.
    /// * `onsets` - Non-negative, non-decreasing note start times in seconds,
    /// one more than the number of intervals.
    /// * `first_pitch` - The pitch of the first note in semitones.
    pub fn new<S: Into<String>>(
        name: S,
        intervals: Vec<f32>,
        onsets: Vec<f32>,
        first_pitch: f32,
    ) -> Result<Self> {
        let name = name.into();
        if intervals.is_empty() {
            return Err(Error::EmptyMelody { name });
        }
        if onsets.len() != intervals.len() + 1 {
            return Err(Error::OnsetCountMismatch {
                name,
                intervals: intervals.len(),
                onsets: onsets.len(),
            });
        }
        if let Some(index) = intervals.first_non_finite() {
            return Err(Error::NonFiniteValue {
                name,
                sequence: "interval",
                index,
            });
        }
        if let Some(index) = onsets.first_non_finite() {
            return Err(Error::NonFiniteValue {
                name,
                sequence: "onset",
                index,
            });
        }
        if !first_pitch.is_finite() {
            return Err(Error::NonFiniteValue {
                name,
                sequence: "first pitch",
                index: 0,
            });
        }
        if let Some(index) = onsets.iter().position(|onset| *onset < 0.0) {
            return Err(Error::NegativeOnset { name, index });
        }
        if let Some(index) = onsets.first_decrease() {
            return Err(Error::NonMonotonicOnsets { name, index });
        }

        Ok(ReferenceMelody {
            name,
            intervals: intervals.into_boxed_slice(),
            onsets: onsets.into_boxed_slice(),
            first_pitch,
        })
    }

    /// Creates a reference melody from the comma separated interval and onset text
    /// resources produced by the melody extraction step.
    pub fn from_text<S: Into<String>>(
        name: S,
        intervals_text: &str,
        onsets_text: &str,
        first_pitch: f32,
    ) -> Result<Self> {
        let intervals = parse_values(intervals_text)?;
        let onsets = parse_values(onsets_text)?;
        ReferenceMelody::new(name, intervals, onsets, first_pitch)
    }

    /// Returns a melody with the same name, onsets and first pitch, where each interval
    /// has been replaced by the symbol of its [Contour](enum.Contour.html).
    pub fn to_contour(&self, same_threshold: f32) -> ReferenceMelody {
        let intervals: Box<[f32]> = self
            .intervals
            .iter()
            .map(|interval| Contour::from_interval(*interval, same_threshold).symbol())
            .collect();
        ReferenceMelody {
            name: self.name.clone(),
            intervals,
            onsets: self.onsets.clone(),
            first_pitch: self.first_pitch,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn intervals(&self) -> &[f32] {
        &self.intervals
    }

    pub fn onsets(&self) -> &[f32] {
        &self.onsets
    }

    pub fn first_pitch(&self) -> f32 {
        self.first_pitch
    }

    /// Returns the number of intervals, i.e one less than the number of notes.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Always false, since empty melodies are rejected on construction.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The onset of the last note in seconds.
    pub fn last_onset(&self) -> f32 {
        self.onsets[self.onsets.len() - 1]
    }

    /// Returns the absolute pitch of every note, starting with `first_pitch`.
    pub fn pitches(&self) -> Vec<f32> {
        self.intervals.running_sum(self.first_pitch)
    }
}
