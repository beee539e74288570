use std::sync::Arc;

use micro_hum::matcher::{BeliefAggregator, Hypothesis};
use micro_hum::melody::{Contour, ReferenceMelody, DEFAULT_SAME_THRESHOLD};
use micro_hum::session::{IntervalQuantization, ListeningSession, NoteEvent, SessionConfig};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// (name, intervals, onsets, first pitch) as produced by the melody extraction step.
const DATABASE: [(&str, &str, &str, f32); 4] = [
    (
        "twinkle",
        "0,7,0,2,0,-2,-2,0,-1,0,-2,0,-2",
        "0.0,0.5,1.0,1.5,2.0,2.5,3.0,4.0,4.5,5.0,5.5,6.0,6.5,7.0",
        60.,
    ),
    (
        "mary_had_a_little_lamb",
        "-2,-2,2,2,0,0,-2,0,0,2,3,0,\n",
        "0.0,0.6,1.2,1.8,2.4,3.0,3.6,4.8,5.4,6.0,7.2,7.8,8.4",
        64.,
    ),
    (
        "london_bridge",
        "2,-2,-2,-2,2,2,-5,2,2,-2,2,2",
        "0.0,0.75,1.0,1.5,2.0,2.5,3.0,4.0,4.5,5.0,6.0,6.5,7.0",
        67.,
    ),
    (
        "three_blind_mice",
        "-2,-2,4,-2,-2,7,-2,0,-1,3,-2,0",
        "0.0,1.0,2.0,4.0,5.0,6.0,8.0,9.0,9.5,10.0,12.0,13.0,13.5",
        64.,
    ),
];

fn load_database() -> Vec<Arc<ReferenceMelody>> {
    DATABASE
        .iter()
        .map(|(name, intervals, onsets, first_pitch)| {
            Arc::new(ReferenceMelody::from_text(*name, intervals, onsets, *first_pitch).unwrap())
        })
        .collect()
}

fn belief_sum(aggregator: &BeliefAggregator) -> f32 {
    aggregator.beliefs().map(|(_, belief)| belief).sum()
}

/// London bridge sung a whole tone lower, 20% slower, with pitch tracking noise.
fn noisy_london_bridge(seed: u64) -> Vec<NoteEvent> {
    let reference = load_database().remove(2);
    let mut rng = StdRng::seed_from_u64(seed);
    let pitches = reference.pitches();
    pitches
        .iter()
        .zip(reference.onsets().iter())
        .map(|(pitch, onset)| {
            let noise: f32 = rng.gen_range(-0.2..0.2);
            NoteEvent::new(pitch - 2. + noise, 100. + 1.2 * onset)
        })
        .collect()
}

#[test]
fn test_session_identifies_noisy_performance() {
    let mut config = SessionConfig::default();
    config.quantization = IntervalQuantization::Round;
    let mut session = ListeningSession::from_shared(load_database(), config).unwrap();
    let london_bridge = session.aggregator().song_id("london_bridge").unwrap();

    let mut last_report = None;
    for event in noisy_london_bridge(7) {
        let update = session.add_note(event).unwrap();
        if let Some(report) = update.report {
            assert_eq!(report.song, london_bridge);
            last_report = Some(report.estimate);
        }
        assert!((belief_sum(session.aggregator()) - 1.0).abs() <= 1e-4);
    }

    let estimate = last_report.expect("london bridge was never identified");
    // The first pitch carries the noise but every rounded interval is exact,
    // so the key estimate is off by at most the noise amplitude.
    assert!((estimate.key_diff + 2.).abs() <= 0.25);
    assert!((estimate.tempo_ratio - 1. / 1.2).abs() <= 1e-3);
    assert_eq!(estimate.start_offset, 7.0);
    assert_eq!(
        session.aggregator().best().0,
        Hypothesis::Song(london_bridge)
    );
}

#[test]
fn test_session_is_deterministic() {
    let run = || {
        let mut session =
            ListeningSession::from_shared(load_database(), SessionConfig::default()).unwrap();
        let mut history = Vec::new();
        for event in noisy_london_bridge(11) {
            let update = session.add_note(event).unwrap();
            history.extend(update.costs.iter().map(|cost| cost.to_bits()));
            history.extend(session.aggregator().beliefs().map(|(_, b)| b.to_bits()));
        }
        history
    };
    assert_eq!(run(), run());
}

#[test]
fn test_exact_query_has_zero_cost() {
    let database = load_database();
    let mut aggregator = BeliefAggregator::new(database.clone()).unwrap();
    let mice = aggregator.song_id("three_blind_mice").unwrap();
    for interval in database[3].intervals().iter() {
        aggregator.add_note(*interval).unwrap();
        let track = aggregator.track(mice);
        assert_eq!(track.trace().len(), track.step_count());
    }
    let track = aggregator.track(mice);
    assert_eq!(track.cost(), Some(0.));
    assert_eq!(track.trace().last().unwrap().reference_row, database[3].len());
    assert_eq!(aggregator.confident_match(0.8), Some(mice));
}

#[test]
fn test_unrelated_humming_is_not_matched() {
    let mut aggregator = BeliefAggregator::new(load_database()).unwrap();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..60 {
        // Every reference interval lies within an octave, these jumps are more than two octaves.
        let magnitude: f32 = rng.gen_range(25.0..36.0);
        let interval = if rng.gen_bool(0.5) { magnitude } else { -magnitude };
        aggregator.add_note(interval).unwrap();
        assert!((belief_sum(&aggregator) - 1.0).abs() <= 1e-4);
        assert_eq!(aggregator.confident_match(0.8), None);
    }
    assert!(aggregator.belief(Hypothesis::Other) > 0.999);
}

#[test]
fn test_contour_matching() {
    let contours: Vec<Arc<ReferenceMelody>> = load_database()
        .iter()
        .map(|melody| Arc::new(melody.to_contour(DEFAULT_SAME_THRESHOLD)))
        .collect();
    let mut aggregator = BeliefAggregator::new(contours).unwrap();
    let mary = aggregator.song_id("mary_had_a_little_lamb").unwrap();

    // Right directions, wrong sizes
    let sung = [-3., -1.5, 4., 1.5, 0.5, 0., -3., 0., 0.2, 3., 5., 0.];
    for interval in sung.iter() {
        let symbol = Contour::from_interval(*interval, DEFAULT_SAME_THRESHOLD).symbol();
        aggregator.add_note(symbol).unwrap();
    }
    assert_eq!(aggregator.track(mary).cost(), Some(0.));
    assert_eq!(aggregator.confident_match(0.8), Some(mary));
}

#[test]
fn test_malformed_database_fails_fast() {
    assert!(ReferenceMelody::from_text("a", "1,2,3", "0,1,2", 60.).is_err());
    assert!(ReferenceMelody::from_text("a", "1,2,x", "0,1,2,3", 60.).is_err());
    assert!(ReferenceMelody::from_text("a", "1,2,3", "0,2,1,3", 60.).is_err());
    assert!(ReferenceMelody::from_text("a", "", "0", 60.).is_err());

    let mut database = load_database();
    database.push(database[0].clone());
    assert!(ListeningSession::from_shared(database, SessionConfig::default()).is_err());
}
