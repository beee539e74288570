//! Listening sessions.
//!
//! A [ListeningSession](struct.ListeningSession.html) consumes the notes reported by a note
//! segmentation stage, identifies the song being performed and keeps the playback
//! corrections up to date while the performance continues. It owns all mutable
//! matching state, so a host running several inputs simply creates one session per input,
//! sharing the reference melodies between them.
//!
//! # Example
//! ```
//! use micro_hum::melody::ReferenceMelody;
//! use micro_hum::session::{ListeningSession, NoteEvent, SessionConfig};
//!
//! let mary = ReferenceMelody::new(
//!     "mary",
//!     vec![-2., -2., 2., 2., 0., 0.],
//!     vec![0., 0.5, 1.0, 1.5, 2.0, 2.5, 3.0],
//!     64.,
//! ).unwrap();
//! let mut session = ListeningSession::new(vec![mary], SessionConfig::default()).unwrap();
//!
//! let mut identified = false;
//! for (i, pitch) in [64., 62., 60., 62., 64., 64., 64.].iter().enumerate() {
//!     let update = session.add_note(NoteEvent::new(*pitch, 0.5 * i as f32)).unwrap();
//!     if let Some(report) = update.report {
//!         assert_eq!(report.name, "mary");
//!         assert!(report.estimate.key_diff.abs() < 1e-5);
//!         identified = true;
//!     }
//! }
//! assert!(identified);
//!
//! // Nothing heard for a while, start over.
//! assert!(session.poll(10.0));
//! assert!(session.matched().is_none());
//! ```

mod config;
mod listening_session;

pub use config::{IntervalQuantization, MatchMode, SessionConfig};
pub use listening_session::{
    ListeningSession, NoteEvent, SessionUpdate, SyncReport, MAX_PITCH_MAGNITUDE,
};
