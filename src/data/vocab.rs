// ============================================================
// Layer 4 — Vocabulary
// ============================================================
// The bidirectional mapping between note/chord tokens and the
// dense integer indices the model actually works with.
//
// The index assignment is load-bearing: the same index is used
// to build training targets and, much later, to decode the
// model's predictions. The order therefore has to be exactly
// reproducible from the same corpus, on every platform. We get
// that by sorting the distinct tokens lexicographically
// (byte-wise string order, no locale involved) and numbering
// them 0..n in that order.
//
// Built once per training run, immutable afterwards, and
// persisted next to the model weights so generation sees the
// identical assignment (see infra/store.rs).
//
// Reference: Rust Book §8 (HashMaps)
//            BTreeSet documentation (sorted iteration)

use std::collections::{BTreeSet, HashMap};

use crate::domain::error::ComposerError;

/// The ordered set of all distinct tokens seen during training,
/// with a fixed index per token.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    /// Tokens in index order; position = index
    tokens: Vec<String>,
    /// Reverse lookup, token → index
    index: HashMap<String, usize>,
}

impl Vocabulary {
    /// Build the vocabulary from a token stream: distinct tokens,
    /// sorted lexicographically, numbered in that order.
    pub fn build(stream: &[String]) -> Self {
        // BTreeSet both deduplicates and iterates in sorted order
        let distinct: BTreeSet<&String> = stream.iter().collect();
        Self::from_tokens(distinct.into_iter().cloned().collect())
    }

    /// Restore a vocabulary from an already-ordered token list (the
    /// persisted form). The order is taken verbatim, never re-derived,
    /// so a vocabulary written by an older run keeps its meaning.
    pub fn from_tokens(tokens: Vec<String>) -> Self {
        let index = tokens
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();
        Self { tokens, index }
    }

    /// Token → index. Fails if the token was never seen at build time.
    pub fn encode(&self, token: &str) -> Result<usize, ComposerError> {
        self.index
            .get(token)
            .copied()
            .ok_or_else(|| ComposerError::UnknownToken(token.to_string()))
    }

    /// Index → token. Fails if the index is outside the vocabulary.
    pub fn decode(&self, index: usize) -> Result<&str, ComposerError> {
        self.tokens
            .get(index)
            .map(String::as_str)
            .ok_or(ComposerError::IndexOutOfRange {
                index,
                vocab_size: self.tokens.len(),
            })
    }

    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The ordered token list, for persistence.
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn stream(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_build_sorts_and_dedupes() {
        let v = Vocabulary::build(&stream(&["G4", "C4", "E4", "C4", "C4.E4.G4"]));
        assert_eq!(v.tokens(), &["C4", "C4.E4.G4", "E4", "G4"]);
        assert_eq!(v.len(), 4);
    }

    #[test]
    fn test_build_is_deterministic() {
        let s = stream(&["B3", "A3", "C4", "A3", "0.4.7"]);
        let a = Vocabulary::build(&s);
        let b = Vocabulary::build(&s);
        assert_eq!(a.tokens(), b.tokens());
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let v = Vocabulary::build(&stream(&["C4", "E4", "G4", "0.4.7"]));
        for token in v.tokens().to_vec() {
            let i = v.encode(&token).unwrap();
            assert_eq!(v.decode(i).unwrap(), token);
        }
    }

    #[test]
    fn test_unknown_token_rejected() {
        let v = Vocabulary::build(&stream(&["C4"]));
        assert!(matches!(
            v.encode("D4"),
            Err(ComposerError::UnknownToken(t)) if t == "D4"
        ));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let v = Vocabulary::build(&stream(&["C4", "E4"]));
        assert!(matches!(
            v.decode(2),
            Err(ComposerError::IndexOutOfRange { index: 2, vocab_size: 2 })
        ));
    }

    #[test]
    fn test_restore_keeps_given_order() {
        // A persisted vocabulary is taken verbatim even if a rebuild
        // would order it differently
        let v = Vocabulary::from_tokens(stream(&["G4", "C4"]));
        assert_eq!(v.decode(0).unwrap(), "G4");
        assert_eq!(v.encode("C4").unwrap(), 1);
    }
}
