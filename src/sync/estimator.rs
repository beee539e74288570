use crate::common::F32ArrayExt;
use crate::matcher::AlignmentTrack;
use crate::{Error, Result};

/// The corrections needed to play a reference recording in sync with the performer.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SyncEstimate {
    /// Pitch shift in semitones to apply to the reference recording. Positive
    /// values mean the performer sings higher than the recording.
    pub key_diff: f32,
    /// Elapsed reference time divided by elapsed performance time. Values
    /// above 1 mean the recording is faster than the performer.
    pub tempo_ratio: f32,
    /// Position in seconds in the reference recording of the next note the
    /// performer has not reached yet, i.e where playback should resume.
    pub start_offset: f32,
}

/// Estimates key, tempo and playback position from the alignment trace of a track.
///
/// # Arguments
///
/// * `track` - A track that has processed at least one interval.
/// * `query_first_pitch` - The pitch in semitones of the first sung note.
/// * `reference_first_pitch` - The pitch in semitones of the first reference note.
/// * `query_onsets` - Onset times of the sung notes in seconds, relative to the first note.
/// Must contain one more element than the number of intervals processed by `track`.
pub fn estimate(
    track: &AlignmentTrack,
    query_first_pitch: f32,
    reference_first_pitch: f32,
    query_onsets: &[f32],
) -> Result<SyncEstimate> {
    let step_count = track.step_count();
    let trace = track.trace();
    if step_count == 0 {
        return Err(Error::Precondition(
            "sync estimate requires at least one processed interval",
        ));
    }
    if trace.len() != step_count {
        return Err(Error::Precondition("alignment trace length differs from step count"));
    }
    if query_onsets.len() != step_count + 1 {
        return Err(Error::Precondition(
            "query onset count must be one more than the number of processed intervals",
        ));
    }

    let reference = track.reference();
    let reference_pitches = reference.intervals().running_sum(reference_first_pitch);
    let query_pitches = track.query().running_sum(query_first_pitch);

    // Average pitch offset over every aligned point, including the first notes
    let mut offset_sum = query_first_pitch - reference_first_pitch;
    for point in trace.iter() {
        offset_sum += query_pitches[point.query_index] - reference_pitches[point.reference_row];
    }
    let key_diff = offset_sum / ((step_count + 1) as f32);

    // The trace is non-empty, checked above
    let last = trace[trace.len() - 1];
    let reference_onsets = reference.onsets();
    let query_elapsed = query_onsets[last.query_index];
    if !(query_elapsed > 0.0) {
        return Err(Error::Precondition(
            "query onset at the last aligned note must be positive",
        ));
    }
    let tempo_ratio = reference_onsets[last.reference_row] / query_elapsed;

    // Once the whole reference has been consumed there is no next note, resume at the last one.
    let next_row = (last.reference_row + 1).min(reference_onsets.len() - 1);
    let start_offset = reference_onsets[next_row];

    Ok(SyncEstimate {
        key_diff,
        tempo_ratio,
        start_offset,
    })
}

/// Like [estimate](fn.estimate.html), using the first pitch stored in the track's reference melody.
pub fn estimate_with_reference(
    track: &AlignmentTrack,
    query_first_pitch: f32,
    query_onsets: &[f32],
) -> Result<SyncEstimate> {
    estimate(
        track,
        query_first_pitch,
        track.reference().first_pitch(),
        query_onsets,
    )
}
