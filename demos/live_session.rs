use std::thread;
use std::time::{Duration, Instant};

use micro_hum::melody::ReferenceMelody;
use micro_hum::session::{ListeningSession, NoteEvent, SessionConfig};
use rtrb::RingBuffer;

fn note_number_to_string(note_number: f32) -> String {
    let note_names = [
        "A", "A#", "B", "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#",
    ];
    let a0_number = 21;
    let nearest_midi_note = (note_number.round() as usize).max(a0_number);
    let octave_index = (nearest_midi_note - a0_number) / 12;
    let note_in_octave = (nearest_midi_note - a0_number) - 12 * octave_index;
    format!("{}{}", note_names[note_in_octave], octave_index)
}

fn database() -> Vec<ReferenceMelody> {
    let songs = [
        (
            "twinkle",
            "0,7,0,2,0,-2,-2,0,-1,0,-2,0,-2",
            "0.0,0.5,1.0,1.5,2.0,2.5,3.0,4.0,4.5,5.0,5.5,6.0,6.5,7.0",
            60.,
        ),
        (
            "mary_had_a_little_lamb",
            "-2,-2,2,2,0,0,-2,0,0,2,3,0",
            "0.0,0.6,1.2,1.8,2.4,3.0,3.6,4.8,5.4,6.0,7.2,7.8,8.4",
            64.,
        ),
        (
            "london_bridge",
            "2,-2,-2,-2,2,2,-5,2,2,-2,2,2",
            "0.0,0.75,1.0,1.5,2.0,2.5,3.0,4.0,4.5,5.0,6.0,6.5,7.0",
            67.,
        ),
    ];
    songs
        .iter()
        .filter_map(|(name, intervals, onsets, first_pitch)| {
            match ReferenceMelody::from_text(*name, intervals, onsets, *first_pitch) {
                Ok(melody) => Some(melody),
                Err(error) => {
                    println!("Skipping {}: {}", name, error);
                    None
                }
            }
        })
        .collect()
}

fn main() {
    // Stands in for a pitch tracker with note segmentation running on the audio thread:
    // sings mary had a little lamb a minor third up and a bit slower than the recording.
    let (mut to_main_thread, mut from_performer) = RingBuffer::<NoteEvent>::new(64).split();
    let start = Instant::now();
    let performer = thread::spawn(move || {
        let pitches = [67.1, 65., 62.8, 65.2, 67., 66.9, 67., 65., 65.1, 64.9, 67., 70.2, 70.];
        let note_duration = Duration::from_millis(700);
        for pitch in pitches.iter() {
            let onset = start.elapsed().as_secs_f32();
            if to_main_thread.push(NoteEvent::new(*pitch, onset)).is_err() {
                break;
            }
            thread::sleep(note_duration);
        }
    });

    let mut session = match ListeningSession::new(database(), SessionConfig::default()) {
        Ok(session) => session,
        Err(error) => {
            println!("Could not create session: {}", error);
            return;
        }
    };
    println!("Listening. Waiting for notes.");

    let poll_interval_ms = 30;

    loop {
        thread::sleep(Duration::from_millis(poll_interval_ms));

        while let Ok(event) = from_performer.pop() {
            match session.add_note(event) {
                Ok(update) => {
                    print!("{:>4} at {:.2} s", note_number_to_string(event.pitch), event.onset);
                    match update.report {
                        Some(report) => println!(
                            " | {}{} key {:+.2} tempo {:.2} resume at {:.2} s",
                            if report.is_new { "identified " } else { "" },
                            report.name,
                            report.estimate.key_diff,
                            report.estimate.tempo_ratio,
                            report.estimate.start_offset
                        ),
                        None => println!(" | best {:?} {:.2}", update.best.0, update.best.1),
                    }
                }
                Err(error) => println!("Dropped note: {}", error),
            }
        }

        if session.poll(start.elapsed().as_secs_f32()) {
            println!("Silence, listening for a new performance.");
        }

        if performer.is_finished() && from_performer.is_empty() {
            println!("No more notes.");
            break;
        }
    }
    let _ = performer.join();
}
