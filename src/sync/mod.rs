//! Key, tempo and playback position estimation.
//!
//! Once a song has been identified, the alignment trace of its
//! [AlignmentTrack](../matcher/struct.AlignmentTrack.html) pairs every sung note with a
//! reference note. From these pairs and the onset times of both melodies, the
//! [estimate](fn.estimate.html) function computes
//! * the key difference, as the average pitch offset over all aligned notes,
//! * the tempo ratio, as the ratio of elapsed reference time to elapsed performance time at the most recent aligned note,
//! * the start offset, as the reference onset of the next note the performer has not reached.
//!
//! The playback collaborator applies the key difference as a pitch shift and the tempo ratio as
//! a time stretch factor, starting at the start offset.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use micro_hum::matcher::AlignmentTrack;
//! use micro_hum::melody::ReferenceMelody;
//! use micro_hum::sync::estimate;
//!
//! let melody = ReferenceMelody::new("test", vec![2., -2., 2.], vec![0., 1., 2., 3.], 60.).unwrap();
//! let mut track = AlignmentTrack::new(Arc::new(melody));
//! track.add_notes(&[2., -2., 2.]).unwrap();
//!
//! // The performer sings at half the reference tempo, at the same pitch.
//! let result = estimate(&track, 60., 60., &[0., 2., 4., 6.]).unwrap();
//! assert!((result.tempo_ratio - 0.5).abs() < 1e-6);
//! assert!(result.key_diff.abs() < 1e-6);
//! ```

mod estimator;

pub use estimator::{estimate, estimate_with_reference, SyncEstimate};
