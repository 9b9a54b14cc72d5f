// ============================================================
// Layer 4 — Window Sampler
// ============================================================
// Slices the flat token stream into fixed-length training
// windows with next-token targets.
//
// Example with window_len = 3:
//   Stream:   A B C D E
//   Window 0: [A B C] → D
//   Window 1: [B C D] → E
//
// The slice slides by exactly one position (stride = 1), so a
// stream of length L yields L - window_len windows, in stream
// order, with nothing skipped and nothing shuffled. Shuffling
// is a training-time concern and happens in the data loader.
//
// The model consumes a numeric form of the window: each index
// divided by the vocabulary size, giving floats in [0, 1).
// That is a plain rescaling for numeric compatibility with the
// persisted weights, NOT a statistical (mean/variance)
// normalization. Changing it would silently invalidate every
// trained checkpoint.
//
// Reference: Rust Book §8 (Slices)

use crate::data::vocab::Vocabulary;
use crate::domain::error::ComposerError;

/// One training window: a fixed-length run of vocabulary indices
/// and the index of the token that follows it.
#[derive(Debug, Clone)]
pub struct Window {
    pub indices: Vec<usize>,
    pub target: usize,
}

/// Cut the token stream into stride-1 sliding windows.
///
/// Produces exactly `stream.len() - window_len` windows. Needs the
/// stream to be strictly longer than the window, otherwise there is
/// not a single (window, target) pair to cut.
pub fn make_windows(
    stream: &[String],
    vocab: &Vocabulary,
    window_len: usize,
) -> Result<Vec<Window>, ComposerError> {
    if stream.len() <= window_len {
        return Err(ComposerError::InsufficientData {
            tokens: stream.len(),
            window: window_len,
        });
    }

    let mut windows = Vec::with_capacity(stream.len() - window_len);
    for start in 0..stream.len() - window_len {
        let indices = stream[start..start + window_len]
            .iter()
            .map(|t| vocab.encode(t))
            .collect::<Result<Vec<_>, _>>()?;
        let target = vocab.encode(&stream[start + window_len])?;
        windows.push(Window { indices, target });
    }

    Ok(windows)
}

/// Scale window indices to [0, 1) by dividing by the vocabulary size.
pub fn normalize(indices: &[usize], vocab_size: usize) -> Vec<f32> {
    indices
        .iter()
        .map(|&i| i as f32 / vocab_size as f32)
        .collect()
}
