// ============================================================
// Layer 4 — MIDI Score Writer
// ============================================================
// The inverse of the corpus loader: takes the generated token
// sequence and writes it out as a playable .mid file.
//
// Timing is deliberately simple. Every token gets the same
// fixed offset increment of half a quarter note (240 ticks at
// 480 ticks per quarter), so offsets are strictly increasing
// and nothing overlaps. Each note or chord sounds for exactly
// one step and is released as the next one starts.
//
// Chord tokens carry pitch classes, not octaves, so they are
// voiced in octave 4 (MIDI 60 + class) on the way out — the
// same voicing the trained-against corpus pipeline used.
//
// The output file gets a random 10-character alphanumeric name
// with a .mid extension, written into the configured output
// directory, and the filename is returned to the caller.
//
// Reference: midly crate documentation
//            MIDI 1.0 spec (SMF format 0)

use anyhow::{Context, Result};
use midly::{
    num::{u15, u28, u4, u7},
    Format, Header, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind,
};
use rand::{distributions::Alphanumeric, Rng};
use std::{fs, path::PathBuf};

use crate::domain::token;
use crate::domain::traits::ScoreSink;

/// Ticks per quarter note in the output file.
const TICKS_PER_QUARTER: u16 = 480;

/// Offset increment per token: half a quarter note.
const TICKS_PER_STEP: u32 = TICKS_PER_QUARTER as u32 / 2;

/// Length of the random part of the output filename.
const FILENAME_LEN: usize = 10;

/// Writes generated token sequences into a directory of .mid files.
/// Implements the ScoreSink trait from Layer 3.
pub struct MidiScoreWriter {
    output_dir: PathBuf,
}

impl MidiScoreWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self { output_dir: output_dir.into() }
    }
}

impl ScoreSink for MidiScoreWriter {
    fn write(&self, tokens: &[String]) -> Result<String> {
        let smf = tokens_to_smf(tokens)?;

        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("cannot create output directory '{}'", self.output_dir.display())
        })?;

        let filename = random_filename();
        let path = self.output_dir.join(&filename);
        smf.save(&path)
            .with_context(|| format!("cannot write '{}'", path.display()))?;

        tracing::info!("Wrote {} tokens to '{}'", tokens.len(), path.display());
        Ok(filename)
    }
}

/// Build the single-track SMF for a token sequence.
fn tokens_to_smf(tokens: &[String]) -> Result<Smf<'static>> {
    let mut smf = Smf::new(Header::new(
        Format::SingleTrack,
        Timing::Metrical(u15::new(TICKS_PER_QUARTER)),
    ));

    let mut track: Track<'static> = Vec::new();
    let mut last_tick = 0u32;

    for (step, tok) in tokens.iter().enumerate() {
        let keys = token::token_to_keys(tok)?;
        let on_tick = step as u32 * TICKS_PER_STEP;

        // All keys of a note/chord start together...
        for (i, &key) in keys.iter().enumerate() {
            let delta = if i == 0 { on_tick - last_tick } else { 0 };
            track.push(TrackEvent {
                delta: u28::new(delta),
                kind: TrackEventKind::Midi {
                    channel: u4::new(0),
                    message: MidiMessage::NoteOn { key: u7::new(key), vel: u7::new(90) },
                },
            });
        }

        // ...and are released one step later, right as the next
        // token starts.
        for (i, &key) in keys.iter().enumerate() {
            let delta = if i == 0 { TICKS_PER_STEP } else { 0 };
            track.push(TrackEvent {
                delta: u28::new(delta),
                kind: TrackEventKind::Midi {
                    channel: u4::new(0),
                    message: MidiMessage::NoteOff { key: u7::new(key), vel: u7::new(0) },
                },
            });
        }

        last_tick = on_tick + TICKS_PER_STEP;
    }

    track.push(TrackEvent {
        delta: u28::new(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });
    smf.tracks.push(track);

    Ok(smf)
}

/// 10 random alphanumeric characters plus the .mid extension.
fn random_filename() -> String {
    let name: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(FILENAME_LEN)
        .map(char::from)
        .collect();
    format!("{name}.mid")
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::MidiCorpusLoader;
    use crate::domain::traits::NoteSource;

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_filename_shape() {
        let name = random_filename();
        assert_eq!(name.len(), FILENAME_LEN + 4);
        assert!(name.ends_with(".mid"));
        assert!(name[..FILENAME_LEN].chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_offsets_increase_by_a_fixed_step() {
        let smf = tokens_to_smf(&tokens(&["C4", "E4", "G4"])).unwrap();
        let track = &smf.tracks[0];

        // NoteOn absolute ticks must be 0, 240, 480
        let mut tick = 0u32;
        let mut on_ticks = Vec::new();
        for ev in track {
            tick += ev.delta.as_int();
            if let TrackEventKind::Midi { message: MidiMessage::NoteOn { .. }, .. } = ev.kind {
                on_ticks.push(tick);
            }
        }
        assert_eq!(on_ticks, vec![0, TICKS_PER_STEP, 2 * TICKS_PER_STEP]);
    }

    #[test]
    fn test_written_file_round_trips_through_the_loader() {
        let dir = tempfile::tempdir().unwrap();
        let writer = MidiScoreWriter::new(dir.path());

        let original = tokens(&["C4", "E4", "0.4.7", "G4", "F#3"]);
        let filename = writer.write(&original).unwrap();
        assert!(dir.path().join(&filename).exists());

        let loader =
            MidiCorpusLoader::new(dir.path().join("*.mid").to_string_lossy().to_string());
        assert_eq!(loader.load().unwrap(), original);
    }

    #[test]
    fn test_malformed_token_is_rejected() {
        assert!(tokens_to_smf(&tokens(&["C4", "nonsense"])).is_err());
    }
}
