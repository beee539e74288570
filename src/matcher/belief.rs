use alloc::{boxed::Box, sync::Arc, vec, vec::Vec};

use crate::common::softmin;
use crate::matcher::alignment_track::{check_symbol, AlignmentTrack};
use crate::matcher::config::MatcherConfig;
use crate::melody::ReferenceMelody;
use crate::{Error, Result};

/// Identifies a reference song within a [BeliefAggregator](struct.BeliefAggregator.html).
/// Ids are assigned in the order the melodies were passed to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SongId(usize);

impl SongId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// An outcome the aggregator assigns a probability to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hypothesis {
    /// The performance is the given reference song.
    Song(SongId),
    /// The performance matches none of the reference songs.
    Other,
}

/// Tracks the probability that the ongoing performance is each of a fixed set of reference songs,
/// or none of them.
pub struct BeliefAggregator {
    tracks: Vec<AlignmentTrack>,
    config: MatcherConfig,
    /// Per hypothesis costs from the last note. The last element is the catch-all.
    costs: Box<[f32]>,
    /// Scratch buffer for normalized likelihoods.
    likelihoods: Box<[f32]>,
    /// Per hypothesis probabilities. The last element is the catch-all.
    belief: Box<[f32]>,
    step_count: usize,
}

impl BeliefAggregator {
    pub fn new(melodies: Vec<Arc<ReferenceMelody>>) -> Result<Self> {
        BeliefAggregator::from_options(melodies, MatcherConfig::default())
    }

    /// Creates an aggregator with one alignment track per melody. Fails if the config is
    /// invalid, if no melodies are given or if two melodies share a name.
    pub fn from_options(melodies: Vec<Arc<ReferenceMelody>>, config: MatcherConfig) -> Result<Self> {
        config.validate()?;
        if melodies.is_empty() {
            return Err(Error::EmptyDatabase);
        }
        for (index, melody) in melodies.iter().enumerate() {
            if melodies[..index].iter().any(|m| m.name() == melody.name()) {
                return Err(Error::DuplicateSong {
                    name: melody.name().into(),
                });
            }
        }

        let hypothesis_count = melodies.len() + 1;
        let tracks: Vec<AlignmentTrack> = melodies
            .into_iter()
            .map(|melody| AlignmentTrack::from_options(melody, config.weights))
            .collect();

        let mut aggregator = BeliefAggregator {
            tracks,
            config,
            costs: vec![0.; hypothesis_count].into_boxed_slice(),
            likelihoods: vec![0.; hypothesis_count].into_boxed_slice(),
            belief: vec![0.; hypothesis_count].into_boxed_slice(),
            step_count: 0,
        };
        aggregator.reset_belief();
        Ok(aggregator)
    }

    /// Feeds an interval to every alignment track and updates the belief.
    /// Returns the alignment cost of each song, indexed by [SongId](struct.SongId.html).
    ///
    /// Non-finite symbols and symbols larger than
    /// [MAX_SYMBOL_MAGNITUDE](constant.MAX_SYMBOL_MAGNITUDE.html) are rejected
    /// without changing any state.
    pub fn add_note(&mut self, symbol: f32) -> Result<&[f32]> {
        check_symbol(symbol)?;
        self.step_count += 1;
        let song_count = self.tracks.len();
        for (cost, track) in self.costs.iter_mut().zip(self.tracks.iter_mut()) {
            *cost = track.add_note(symbol)?;
        }
        self.costs[song_count] = (self.step_count as f32) * self.config.no_match_unit_cost;

        softmin(&self.costs, &mut self.likelihoods);

        let smoothing = self.config.smoothing;
        for (belief, likelihood) in self.belief.iter_mut().zip(self.likelihoods.iter()) {
            *belief = smoothing * *belief + (1.0 - smoothing) * likelihood;
        }

        log::trace!(
            "Interval {} #{}: costs {:?}, belief {:?}",
            symbol,
            self.step_count,
            self.costs,
            self.belief
        );

        Ok(&self.costs[..song_count])
    }

    /// Discards all alignment state and returns to a uniform belief.
    pub fn reset(&mut self) {
        for track in self.tracks.iter_mut() {
            track.reset();
        }
        for cost in self.costs.iter_mut() {
            *cost = 0.;
        }
        self.step_count = 0;
        self.reset_belief();
        log::debug!("Reset belief over {} songs", self.tracks.len());
    }

    fn reset_belief(&mut self) {
        let uniform = 1.0 / (self.belief.len() as f32);
        for belief in self.belief.iter_mut() {
            *belief = uniform;
        }
    }

    /// Returns the song whose belief exceeds `threshold`, if any.
    /// The catch-all hypothesis never counts as a match.
    pub fn confident_match(&self, threshold: f32) -> Option<SongId> {
        match self.best() {
            (Hypothesis::Song(id), belief) if belief > threshold => Some(id),
            _ => None,
        }
    }

    /// Returns the most probable hypothesis and its belief. Equal beliefs are
    /// resolved in favor of the lowest song id, and songs are preferred over the catch-all.
    pub fn best(&self) -> (Hypothesis, f32) {
        let mut best = (Hypothesis::Other, f32::NEG_INFINITY);
        for (hypothesis, belief) in self.beliefs() {
            if belief > best.1 {
                best = (hypothesis, belief);
            }
        }
        best
    }

    pub fn belief(&self, hypothesis: Hypothesis) -> f32 {
        self.belief[self.hypothesis_index(hypothesis)]
    }

    /// Iterates over every song in id order, followed by the catch-all.
    pub fn beliefs(&self) -> impl Iterator<Item = (Hypothesis, f32)> + '_ {
        let song_count = self.tracks.len();
        self.belief.iter().enumerate().map(move |(index, belief)| {
            let hypothesis = if index < song_count {
                Hypothesis::Song(SongId(index))
            } else {
                Hypothesis::Other
            };
            (hypothesis, *belief)
        })
    }

    /// Per song costs from the last note, indexed by song id.
    pub fn costs(&self) -> &[f32] {
        &self.costs[..self.tracks.len()]
    }

    /// The cost of the catch-all hypothesis after the last note.
    pub fn other_cost(&self) -> f32 {
        self.costs[self.tracks.len()]
    }

    pub fn song_ids(&self) -> impl Iterator<Item = SongId> {
        (0..self.tracks.len()).map(SongId)
    }

    pub fn song_id(&self, name: &str) -> Option<SongId> {
        self.tracks
            .iter()
            .position(|track| track.reference().name() == name)
            .map(SongId)
    }

    /// Panics if `id` was not issued by this aggregator.
    pub fn song_name(&self, id: SongId) -> &str {
        self.tracks[id.0].reference().name()
    }

    /// Panics if `id` was not issued by this aggregator.
    pub fn track(&self, id: SongId) -> &AlignmentTrack {
        &self.tracks[id.0]
    }

    pub fn song_count(&self) -> usize {
        self.tracks.len()
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    fn hypothesis_index(&self, hypothesis: Hypothesis) -> usize {
        match hypothesis {
            Hypothesis::Song(id) => id.0,
            Hypothesis::Other => self.tracks.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn melody(name: &str, intervals: &[f32]) -> Arc<ReferenceMelody> {
        let onsets = (0..=intervals.len()).map(|i| 0.5 * i as f32).collect();
        Arc::new(ReferenceMelody::new(name, intervals.to_vec(), onsets, 60.).unwrap())
    }

    fn database() -> Vec<Arc<ReferenceMelody>> {
        vec![
            melody("twinkle", &[0., 7., 0., 2., 0., -2., -2., 0., -1., 0., -2., 0., -2.]),
            melody("mary", &[-2., -2., 2., 2., 0., 0., -2., 0., 0., 2., 3., 0.]),
            melody("london_bridge", &[2., -2., -2., -2., 2., 2., -5., 2., 2., -2., 2., 2.]),
        ]
    }

    fn belief_sum(aggregator: &BeliefAggregator) -> f32 {
        aggregator.beliefs().map(|(_, belief)| belief).sum()
    }

    #[test]
    fn test_initial_belief_is_uniform() {
        let aggregator = BeliefAggregator::new(database()).unwrap();
        for (_, belief) in aggregator.beliefs() {
            assert!((belief - 0.25).abs() <= 1e-6);
        }
        assert_eq!(aggregator.beliefs().last().unwrap().0, Hypothesis::Other);
        assert_eq!(aggregator.confident_match(0.2), Some(SongId(0)));
    }

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            BeliefAggregator::new(Vec::new()).err(),
            Some(Error::EmptyDatabase)
        );
        let duplicate = vec![melody("a", &[1.]), melody("b", &[2.]), melody("a", &[3.])];
        assert_eq!(
            BeliefAggregator::new(duplicate).err(),
            Some(Error::DuplicateSong { name: "a".into() })
        );
        let mut config = MatcherConfig::default();
        config.smoothing = 2.0;
        assert!(BeliefAggregator::from_options(database(), config).is_err());
    }

    #[test]
    fn test_identifies_sung_melody() {
        let mut aggregator = BeliefAggregator::new(database()).unwrap();
        let mary = aggregator.song_id("mary").unwrap();
        let sung = [-2.2, -1.8, 2.1, 2., 0.3, 0., -2.4, 0.1, 0., 1.7];
        let mut matched = None;
        for symbol in sung.iter() {
            let costs = aggregator.add_note(*symbol).unwrap();
            assert_eq!(costs.len(), 3);
            assert!((belief_sum(&aggregator) - 1.0).abs() <= 1e-4);
            if matched.is_none() {
                matched = aggregator.confident_match(0.8);
            }
        }
        assert_eq!(matched, Some(mary));
        assert_eq!(aggregator.best().0, Hypothesis::Song(mary));
        assert!(aggregator.belief(Hypothesis::Other) < 0.1);
    }

    #[test]
    fn test_noise_drives_belief_to_other() {
        // Every reference interval is within 7 semitones, the noise is at least 30 away.
        let mut aggregator = BeliefAggregator::new(database()).unwrap();
        let mut rng = StdRng::seed_from_u64(123);
        for _ in 0..40 {
            let magnitude: f32 = rng.gen_range(30.0..=40.0);
            let symbol = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
            aggregator.add_note(symbol).unwrap();
            assert!((belief_sum(&aggregator) - 1.0).abs() <= 1e-4);
        }
        assert!(aggregator.belief(Hypothesis::Other) > 0.99);
        for id in aggregator.song_ids() {
            assert!(aggregator.belief(Hypothesis::Song(id)) < 0.01);
        }
        assert_eq!(aggregator.confident_match(0.8), None);
        assert_eq!(aggregator.other_cost(), 80.0);
    }

    #[test]
    fn test_reset_restores_initial_state() {
        let mut aggregator = BeliefAggregator::new(database()).unwrap();
        let symbols = [0., 7., 0., 2.];
        let first: Vec<Vec<f32>> = symbols.iter().map(|s| aggregator.add_note(*s).unwrap().to_vec()).collect();
        let first_belief: Vec<f32> = aggregator.beliefs().map(|(_, b)| b).collect();

        aggregator.reset();
        assert_eq!(aggregator.step_count(), 0);
        for id in aggregator.song_ids() {
            let track = aggregator.track(id);
            assert_eq!(track.step_count(), 0);
            assert!(track.trace().is_empty());
            assert!(track.query().is_empty());
        }
        for (_, belief) in aggregator.beliefs() {
            assert!((belief - 0.25).abs() <= 1e-6);
        }

        let second: Vec<Vec<f32>> = symbols.iter().map(|s| aggregator.add_note(*s).unwrap().to_vec()).collect();
        let second_belief: Vec<f32> = aggregator.beliefs().map(|(_, b)| b).collect();
        assert_eq!(first, second);
        assert_eq!(first_belief, second_belief);
    }

    #[test]
    fn test_long_session_does_not_underflow() {
        let mut aggregator = BeliefAggregator::new(database()).unwrap();
        for _ in 0..5000 {
            aggregator.add_note(50.).unwrap();
        }
        // Every cost is far beyond the range where exp(-cost) is representable
        assert!(aggregator.other_cost() > 1000.);
        assert!(aggregator.costs().iter().all(|cost| *cost > 1000.));
        assert!((belief_sum(&aggregator) - 1.0).abs() <= 1e-4);
        assert!(aggregator.belief(Hypothesis::Other) > 0.99);
    }

    #[test]
    fn test_song_lookup() {
        let aggregator = BeliefAggregator::new(database()).unwrap();
        let id = aggregator.song_id("london_bridge").unwrap();
        assert_eq!(id.index(), 2);
        assert_eq!(aggregator.song_name(id), "london_bridge");
        assert!(aggregator.song_id("lullaby").is_none());
    }

    #[test]
    fn test_rejected_symbol_keeps_belief() {
        let mut aggregator = BeliefAggregator::new(database()).unwrap();
        let london_bridge = aggregator.song_id("london_bridge").unwrap();
        aggregator.add_note(2.).unwrap();
        let costs = aggregator.costs().to_vec();
        let belief: Vec<f32> = aggregator.beliefs().map(|(_, b)| b).collect();

        for symbol in [f32::NAN, f32::NEG_INFINITY, 1.0e20].iter() {
            assert!(matches!(aggregator.add_note(*symbol), Err(Error::Precondition(_))));
        }
        assert_eq!(aggregator.step_count(), 1);
        assert_eq!(aggregator.costs(), &costs[..]);
        assert_eq!(aggregator.beliefs().map(|(_, b)| b).collect::<Vec<f32>>(), belief);
        for id in aggregator.song_ids() {
            assert_eq!(aggregator.track(id).step_count(), 1);
        }

        for symbol in [-2., -2., -2., 2., 2., -5., 2., 2.].iter() {
            aggregator.add_note(*symbol).unwrap();
            assert!((belief_sum(&aggregator) - 1.0).abs() <= 1e-4);
        }
        assert_eq!(aggregator.track(london_bridge).cost(), Some(0.));
        assert_eq!(aggregator.confident_match(0.8), Some(london_bridge));
    }
}
