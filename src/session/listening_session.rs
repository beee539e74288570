use alloc::{sync::Arc, vec::Vec};

use crate::matcher::{BeliefAggregator, Hypothesis, SongId, MAX_SYMBOL_MAGNITUDE};
use crate::melody::{Contour, ReferenceMelody};
use crate::session::config::{MatchMode, SessionConfig};
use crate::sync::{estimate_with_reference, SyncEstimate};
use crate::{Error, Result};

/// The largest accepted note pitch magnitude, which keeps every interval
/// within [MAX_SYMBOL_MAGNITUDE](../matcher/constant.MAX_SYMBOL_MAGNITUDE.html).
pub const MAX_PITCH_MAGNITUDE: f32 = 0.5 * MAX_SYMBOL_MAGNITUDE;

/// A note reported by the note segmentation stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// Pitch in semitones, e.g a MIDI note number with a fractional part.
    pub pitch: f32,
    /// Start time in seconds on any clock, as long as it is shared by all events.
    pub onset: f32,
}

impl NoteEvent {
    pub fn new(pitch: f32, onset: f32) -> Self {
        NoteEvent { pitch, onset }
    }
}

/// Playback corrections for the identified song.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncReport<'a> {
    pub song: SongId,
    pub name: &'a str,
    pub estimate: SyncEstimate,
    /// True for the note on which the song was first identified.
    pub is_new: bool,
}

/// The outcome of adding a note to a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionUpdate<'a> {
    /// Per song alignment costs, indexed by song id. Empty for the first note
    /// of a session, which only establishes the starting pitch and time.
    pub costs: &'a [f32],
    /// The most probable hypothesis and its belief.
    pub best: (Hypothesis, f32),
    /// Present once a song has been identified.
    pub report: Option<SyncReport<'a>>,
}

/// One attempt at recognizing a performance.
///
/// Converts note events to intervals and relative onsets, feeds the intervals to a
/// [BeliefAggregator](../matcher/struct.BeliefAggregator.html), and once a song is
/// identified, re-estimates key, tempo and start offset on every subsequent note.
/// The session starts over after a configurable period without notes.
pub struct ListeningSession {
    aggregator: BeliefAggregator,
    config: SessionConfig,
    /// The pitch of the first note of the current performance.
    first_pitch: Option<f32>,
    first_onset: f32,
    previous_pitch: f32,
    last_onset: f32,
    /// Note onsets relative to the first note.
    onsets: Vec<f32>,
    matched: Option<SongId>,
}

impl ListeningSession {
    pub fn new(melodies: Vec<ReferenceMelody>, config: SessionConfig) -> Result<Self> {
        ListeningSession::from_shared(melodies.into_iter().map(Arc::new).collect(), config)
    }

    /// Creates a session from melodies that may be shared with other sessions.
    /// In contour mode the session matches against its own contour copies.
    pub fn from_shared(melodies: Vec<Arc<ReferenceMelody>>, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let melodies = match config.mode {
            MatchMode::Intervals => melodies,
            MatchMode::Contour(same_threshold) => melodies
                .iter()
                .map(|melody| Arc::new(melody.to_contour(same_threshold)))
                .collect(),
        };
        let aggregator = BeliefAggregator::from_options(melodies, config.matcher)?;
        Ok(ListeningSession {
            aggregator,
            config,
            first_pitch: None,
            first_onset: 0.,
            previous_pitch: 0.,
            last_onset: 0.,
            onsets: Vec::new(),
            matched: None,
        })
    }

    /// Processes the next detected note. Notes must arrive in onset order.
    ///
    /// If more than the silence timeout has passed since the previous note, the session
    /// is reset first and this note starts a new performance.
    pub fn add_note(&mut self, event: NoteEvent) -> Result<SessionUpdate<'_>> {
        if !event.pitch.is_finite() || !event.onset.is_finite() {
            return Err(Error::Precondition("note pitch and onset must be finite"));
        }
        if event.pitch < -MAX_PITCH_MAGNITUDE || event.pitch > MAX_PITCH_MAGNITUDE {
            return Err(Error::Precondition("note pitch out of range"));
        }

        if self.first_pitch.is_some() {
            let gap = event.onset - self.last_onset;
            if gap < 0.0 {
                return Err(Error::Precondition("note onsets must not decrease"));
            }
            if gap > self.config.silence_timeout {
                log::debug!("No notes for {} s, restarting session", gap);
                self.reset();
            }
        }

        let first_pitch = match self.first_pitch {
            Some(first_pitch) => first_pitch,
            None => {
                self.start(event);
                return Ok(SessionUpdate {
                    costs: &[],
                    best: self.aggregator.best(),
                    report: None,
                });
            }
        };

        let interval = event.pitch - self.previous_pitch;
        let symbol = match self.config.mode {
            MatchMode::Intervals => self.config.quantization.apply(interval),
            MatchMode::Contour(same_threshold) => {
                Contour::from_interval(interval, same_threshold).symbol()
            }
        };
        // Fails before touching any state if the symbol is rejected
        self.aggregator.add_note(symbol)?;
        self.previous_pitch = event.pitch;
        self.last_onset = event.onset;
        self.onsets.push(event.onset - self.first_onset);

        let mut is_new = false;
        if self.matched.is_none() {
            self.matched = self
                .aggregator
                .confident_match(self.config.confidence_threshold);
            if let Some(song) = self.matched {
                is_new = true;
                log::info!(
                    "Identified '{}' after {} intervals, belief {}",
                    self.aggregator.song_name(song),
                    self.aggregator.step_count(),
                    self.aggregator.belief(Hypothesis::Song(song))
                );
            }
        }

        let report = match self.matched {
            Some(song) => {
                let track = self.aggregator.track(song);
                match estimate_with_reference(track, first_pitch, &self.onsets) {
                    Ok(estimate) => Some(SyncReport {
                        song,
                        name: self.aggregator.song_name(song),
                        estimate,
                        is_new,
                    }),
                    Err(error) => {
                        log::warn!("Could not estimate sync: {}", error);
                        None
                    }
                }
            }
            None => None,
        };

        Ok(SessionUpdate {
            costs: self.aggregator.costs(),
            best: self.aggregator.best(),
            report,
        })
    }

    /// Resets the session if no note has started within the silence timeout
    /// before `now`. Returns true if the session was reset.
    pub fn poll(&mut self, now: f32) -> bool {
        if self.first_pitch.is_some() && now - self.last_onset > self.config.silence_timeout {
            log::debug!("No notes for {} s, restarting session", now - self.last_onset);
            self.reset();
            true
        } else {
            false
        }
    }

    /// Discards the current performance. The next note starts a new one.
    pub fn reset(&mut self) {
        self.aggregator.reset();
        self.first_pitch = None;
        self.first_onset = 0.;
        self.previous_pitch = 0.;
        self.last_onset = 0.;
        self.onsets.clear();
        self.matched = None;
    }

    fn start(&mut self, event: NoteEvent) {
        self.first_pitch = Some(event.pitch);
        self.first_onset = event.onset;
        self.previous_pitch = event.pitch;
        self.last_onset = event.onset;
        self.onsets.clear();
        self.onsets.push(0.);
    }

    /// The identified song, if any.
    pub fn matched(&self) -> Option<SongId> {
        self.matched
    }

    /// The most recent sync estimate for the identified song, if any.
    pub fn sync_estimate(&self) -> Option<SyncEstimate> {
        let song = self.matched?;
        let first_pitch = self.first_pitch?;
        estimate_with_reference(self.aggregator.track(song), first_pitch, &self.onsets).ok()
    }

    /// Estimates sync against a song chosen by the caller, identified or not.
    pub fn estimate_for(&self, name: &str) -> Result<SyncEstimate> {
        let song = self
            .aggregator
            .song_id(name)
            .ok_or_else(|| Error::UnknownSong { name: name.into() })?;
        let first_pitch = self
            .first_pitch
            .ok_or(Error::Precondition("no performance in progress"))?;
        estimate_with_reference(self.aggregator.track(song), first_pitch, &self.onsets)
    }

    pub fn aggregator(&self) -> &BeliefAggregator {
        &self.aggregator
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The pitch of the first note of the current performance.
    pub fn first_pitch(&self) -> Option<f32> {
        self.first_pitch
    }

    /// Onsets of the notes of the current performance, relative to the first note.
    pub fn onsets(&self) -> &[f32] {
        &self.onsets
    }
}
