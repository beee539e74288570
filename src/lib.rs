//! Real time identification of hummed or sung melodies, with the key, tempo and
//! playback position corrections needed to resume a backing track in sync with the performer.
//!
//! The input is a stream of melodic intervals, i.e the signed semitone difference
//! between consecutive notes as reported by a pitch tracker (see for example
//! [micro-ear](https://github.com/stuffmatic/micro-ear/)). Each interval is aligned
//! against every reference melody using a streaming weighted edit distance with squared
//! numeric costs, so small tracking errors cost little and wrong notes cost a lot.
//! Alignment costs are turned into a smoothed probability distribution over the reference
//! songs plus a catch-all "no match" hypothesis.
//!
//! Features
//! * Per note work is linear in the reference melody length, independent of how long
//! the performer has been singing.
//! * Only a modest amount of memory is allocated on initialization and the query history grows
//! by one entry per note, suitable for real time use.
//! * `no_std` compatible (requires `alloc`).
//!
//! # Modules
//! * [melody](melody/index.html) - reference melodies, loading from text and interval contours.
//! * [matcher](matcher/index.html) - incremental alignment and probability tracking.
//! * [sync](sync/index.html) - key, tempo and start offset estimation from an alignment trace.
//! * [session](session/index.html) - a listening session tying the above together.
//!
//! # Example
//! ```
//! use micro_hum::melody::ReferenceMelody;
//! use micro_hum::session::{ListeningSession, NoteEvent, SessionConfig};
//!
//! let twinkle = ReferenceMelody::new(
//!     "twinkle",
//!     vec![0., 7., 0., 2., 0., -2.],
//!     vec![0., 0.5, 1.0, 1.5, 2.0, 2.5, 3.0],
//!     60.,
//! ).unwrap();
//! let mut session = ListeningSession::new(vec![twinkle], SessionConfig::default()).unwrap();
//!
//! // Sing twinkle twinkle a fifth higher and twice as slow.
//! let pitches = [67., 67., 74., 74., 76., 76., 74.];
//! for (i, pitch) in pitches.iter().enumerate() {
//!     let update = session.add_note(NoteEvent::new(*pitch, i as f32)).unwrap();
//!     if let Some(report) = update.report {
//!         println!("{} key {} tempo {} start {}", report.name, report.estimate.key_diff,
//!             report.estimate.tempo_ratio, report.estimate.start_offset);
//!     }
//! }
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod common;
mod error;
pub mod matcher;
pub mod melody;
pub mod session;
pub mod sync;

pub use error::{Error, Result};
