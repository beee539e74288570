//! Reference melodies, i.e the songs a performance is matched against.
//!
//! A reference melody is described by the intervals between consecutive notes,
//! the onset time of every note and the pitch of the first note. Melodies are
//! validated on construction and immutable afterwards, so they can be shared
//! between listening sessions.
//!
//! # Example
//! Loading a melody from the comma separated text resources produced by the
//! melody extraction step.
//! ```
//! use micro_hum::melody::{rescale_onsets, ReferenceMelody, DEFAULT_FIRST_PITCH};
//!
//! let intervals = "0,7,0,2,0,-2";
//! let onsets = "0.0,0.5,1.0,1.5,2.0,2.5,3.0";
//! let melody = ReferenceMelody::from_text("twinkle", intervals, onsets, DEFAULT_FIRST_PITCH).unwrap();
//! assert_eq!(melody.len(), 6);
//!
//! // The melody track is 3 seconds long, but the backing track is 6 seconds long.
//! let mut stretched = melody.onsets().to_vec();
//! rescale_onsets(&mut stretched, 6.0, 3.0).unwrap();
//! assert_eq!(stretched[6], 6.0);
//! ```

mod contour;
mod reference_melody;
mod text;

pub use contour::{Contour, DEFAULT_SAME_THRESHOLD};
pub use reference_melody::{ReferenceMelody, DEFAULT_FIRST_PITCH};
pub use text::{parse_values, rescale_onsets};
