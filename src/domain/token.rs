// ============================================================
// Layer 3 — Note and Chord Tokens
// ============================================================
// The model does not see MIDI events, it sees string tokens
// drawn from a closed alphabet. Two kinds of event collapse
// into the one alphabet:
//
//   Single note:  its pitch name with octave, sharps notation.
//                 MIDI key 60 → "C4", 61 → "C#4", 70 → "A#4"
//
//   Chord:        the distinct pitch classes of its notes,
//                 sorted ascending, joined with dots.
//                 C major triad → "0.4.7"
//
// Tokens are compared and hashed by exact string equality, so
// both serializations must be canonical: the same notes always
// produce the same string, on every platform.
//
// Both directions live here. The corpus loader uses the
// event → token direction, the score writer uses token → keys.
// Chord tokens carry no octave, so they are voiced back into
// octave 4 (MIDI 60 + pitch class) on the way out.
//
// Reference: Rust Book §8 (Strings)
//            MIDI 1.0 spec (key numbering, C4 = 60)

use crate::domain::error::ComposerError;

/// Pitch class names in sharps notation, index = semitone above C.
const PITCH_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone above C for each letter A..G (A=9 ... G=7).
fn letter_semitone(letter: char) -> Option<i32> {
    match letter {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Serialize a single MIDI key as a pitch-name token, e.g. 60 → "C4".
/// Octave numbering follows the C4 = 60 convention.
pub fn note_token(key: u8) -> String {
    let class = (key % 12) as usize;
    let octave = (key / 12) as i32 - 1;
    format!("{}{}", PITCH_NAMES[class], octave)
}

/// Serialize a group of simultaneous MIDI keys as a chord token:
/// distinct pitch classes, ascending, dot-joined. "0.4.7" for C major.
pub fn chord_token(keys: &[u8]) -> String {
    let mut classes: Vec<u8> = keys.iter().map(|k| k % 12).collect();
    classes.sort_unstable();
    classes.dedup();
    classes
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

/// A chord token either contains a dot or is a bare pitch-class
/// digit string (a one-note "chord" like "7").
pub fn is_chord(token: &str) -> bool {
    token.contains('.') || token.chars().all(|c| c.is_ascii_digit())
}

/// Turn a token back into the MIDI keys to sound.
///
/// Notes parse their pitch name; chords voice each pitch class in
/// octave 4. A string that parses as neither is rejected, since it
/// cannot have come from this alphabet.
pub fn token_to_keys(token: &str) -> Result<Vec<u8>, ComposerError> {
    if is_chord(token) {
        let mut keys = Vec::new();
        for part in token.split('.') {
            let class: u8 = part
                .parse()
                .map_err(|_| ComposerError::UnknownToken(token.to_string()))?;
            keys.push(60 + (class % 12));
        }
        Ok(keys)
    } else {
        parse_pitch(token)
            .map(|key| vec![key])
            .ok_or_else(|| ComposerError::UnknownToken(token.to_string()))
    }
}

/// Parse a pitch name like "C4", "F#3" or "Bb2" into a MIDI key.
/// Returns None for anything malformed or outside the MIDI range.
fn parse_pitch(name: &str) -> Option<u8> {
    let mut chars = name.chars();
    let mut semitone = letter_semitone(chars.next()?)?;

    // Accidentals: any number of sharps or flats after the letter.
    let rest: String = chars.collect();
    let mut octave_start = 0;
    for c in rest.chars() {
        match c {
            '#' => semitone += 1,
            'b' => semitone -= 1,
            _ => break,
        }
        octave_start += 1;
    }

    let octave: i32 = rest[octave_start..].parse().ok()?;
    let key = (octave + 1) * 12 + semitone;
    u8::try_from(key).ok().filter(|k| *k <= 127)
}
