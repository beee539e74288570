//! Incremental probabilistic melody matching.
//!
//! Each reference melody gets an [AlignmentTrack](struct.AlignmentTrack.html), a streaming
//! weighted edit distance between the reference intervals and the intervals received so far.
//! Three kinds of edits are considered for every new query interval `s` and reference interval `r`:
//! * transposition: align `s` with `r`, costing `(r - s)² + alpha`.
//! * duplication: `s` has no counterpart in the reference, costing `s² + beta`.
//! * dropout: `r` was skipped, costing `r² + gamma`.
//!
//! The [BeliefAggregator](struct.BeliefAggregator.html) runs one track per song and
//! converts the alignment costs to probabilities `∝ exp(-cost)`, alongside a catch-all
//! hypothesis whose cost grows linearly with the number of received intervals. The
//! probabilities are exponentially smoothed over time to form the belief.
//!
//! # Example
//! ```
//! use std::sync::Arc;
//! use micro_hum::matcher::{BeliefAggregator, Hypothesis};
//! use micro_hum::melody::ReferenceMelody;
//!
//! let melody = |name: &str, intervals: &[f32]| {
//!     let onsets = (0..=intervals.len()).map(|i| i as f32).collect();
//!     Arc::new(ReferenceMelody::new(name, intervals.to_vec(), onsets, 60.).unwrap())
//! };
//! let mut aggregator = BeliefAggregator::new(vec![
//!     melody("mary", &[-2., -2., 2., 2., 0., 0.]),
//!     melody("london_bridge", &[2., -2., -2., -2., 2., 2.]),
//! ]).unwrap();
//!
//! for interval in [-2.1, -1.9, 2.2, 1.8].iter() {
//!     let costs = aggregator.add_note(*interval).unwrap();
//!     println!("mary {}, london bridge {}", costs[0], costs[1]);
//! }
//!
//! let mary = aggregator.song_id("mary").unwrap();
//! assert_eq!(aggregator.best().0, Hypothesis::Song(mary));
//! assert_eq!(aggregator.confident_match(0.8), Some(mary));
//! ```

mod alignment_track;
mod belief;
mod config;

pub use alignment_track::{check_symbol, AlignmentTrack, TracePoint, MAX_SYMBOL_MAGNITUDE};
pub use belief::{BeliefAggregator, Hypothesis, SongId};
pub use config::{CostWeights, MatcherConfig};
