// ============================================================
// Layer 4 — MIDI Corpus Loader
// ============================================================
// Loads every .mid file behind a glob pattern and decodes it
// into the flat token stream the pipeline trains on.
//
// How a file becomes tokens:
//   A Standard MIDI File is a header plus tracks of delta-timed
//   events. We walk each track accumulating the absolute tick,
//   keep the NoteOn events (velocity > 0 — a NoteOn with
//   velocity 0 is really a NoteOff), and group the ones that
//   land on the same tick:
//
//     one key on a tick   → pitch-name token   ("C4")
//     several on a tick   → chord token        ("0.4.7")
//
// Per-file streams are concatenated in glob discovery order
// (the glob crate yields paths in sorted order, so discovery
// is deterministic). Concatenation across unrelated files
// creates spurious windows at the file boundaries. Existing
// checkpoints were trained on that stream, so the behavior is
// kept as-is; changing it would invalidate saved weights.
//
// A file that fails to parse is skipped with a warning rather
// than failing the run; an unreadable pattern is fatal.
//
// Reference: midly crate documentation
//            MIDI 1.0 spec (running status, NoteOn semantics)

use anyhow::{Context, Result};
use midly::{MidiMessage, Smf, TrackEventKind};
use std::{fs, path::Path};

use crate::domain::token;
use crate::domain::traits::NoteSource;

/// Loads all .mid files matching a glob pattern.
/// Implements the NoteSource trait from Layer 3.
pub struct MidiCorpusLoader {
    /// Glob pattern, e.g. "datasets/*.mid"
    pattern: String,
}

impl MidiCorpusLoader {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self { pattern: pattern.into() }
    }
}

impl NoteSource for MidiCorpusLoader {
    fn load(&self) -> Result<Vec<String>> {
        let paths = glob::glob(&self.pattern)
            .with_context(|| format!("invalid corpus pattern '{}'", self.pattern))?;

        let mut stream = Vec::new();
        let mut files = 0usize;

        for entry in paths {
            let path = match entry {
                Ok(p) => p,
                Err(e) => {
                    tracing::warn!("Skipping unreadable corpus entry: {}", e);
                    continue;
                }
            };

            match load_single_midi(&path) {
                Ok(tokens) => {
                    tracing::debug!("Parsed {} ({} notes)", path.display(), tokens.len());
                    stream.extend(tokens);
                    files += 1;
                }
                // Log a warning but continue — don't fail on one bad file
                Err(e) => tracing::warn!("Skipping '{}': {}", path.display(), e),
            }
        }

        tracing::info!("Loaded {} notes from {} files", stream.len(), files);
        Ok(stream)
    }
}

/// Parse a single .mid file into its token stream.
fn load_single_midi(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)
        .with_context(|| format!("cannot read '{}'", path.display()))?;

    let smf = Smf::parse(&bytes)
        .with_context(|| format!("cannot parse '{}' as MIDI", path.display()))?;

    let mut tokens = Vec::new();
    for track in &smf.tracks {
        tokens.extend(track_tokens(track));
    }
    Ok(tokens)
}

/// Decode one track: NoteOn events grouped by absolute tick,
/// one token per onset group, in tick order.
fn track_tokens(track: &[midly::TrackEvent]) -> Vec<String> {
    // Onset groups in playback order: (tick, keys sounding at that tick)
    let mut onsets: Vec<(u32, Vec<u8>)> = Vec::new();
    let mut tick = 0u32;

    for event in track {
        tick += event.delta.as_int();

        if let TrackEventKind::Midi { message, .. } = event.kind {
            if let MidiMessage::NoteOn { key, vel } = message {
                if vel.as_int() == 0 {
                    continue; // velocity-0 NoteOn is a NoteOff
                }
                match onsets.last_mut() {
                    Some((last_tick, keys)) if *last_tick == tick => keys.push(key.as_int()),
                    _ => onsets.push((tick, vec![key.as_int()])),
                }
            }
        }
    }

    onsets
        .iter()
        .map(|(_, keys)| {
            if keys.len() == 1 {
                token::note_token(keys[0])
            } else {
                token::chord_token(keys)
            }
        })
        .collect()
}
