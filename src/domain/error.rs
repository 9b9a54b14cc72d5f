// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every failure the pipeline can surface, in one enum.
//
// The split mirrors where the failure originates:
//   - data errors:  the corpus or the token alphabet
//   - model errors: parameters and the training loop
//   - artifact errors: persisted files a run depends on
//
// All errors are fatal to the run that raised them. There is
// no retry inside the core; a caller retries the whole run.
// Partial progress (persisted vocabulary, earlier checkpoints)
// survives a failed training run and stays usable.
//
// Reference: Rust Book §9 (Error Handling)
//            thiserror crate documentation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ComposerError {
    /// The corpus glob matched no files, or the files matched
    /// contained no note events at all.
    #[error("corpus '{0}' produced no notes")]
    EmptyCorpus(String),

    /// The corpus is too short to cut even one training window.
    /// We need strictly more tokens than the window length.
    #[error("corpus has {tokens} notes but windows need more than {window}")]
    InsufficientData { tokens: usize, window: usize },

    /// A token was looked up that was never seen when the
    /// vocabulary was built. Guarded against defensively, not
    /// expected during normal operation.
    #[error("token '{0}' is not in the vocabulary")]
    UnknownToken(String),

    /// A predicted index fell outside the vocabulary.
    #[error("index {index} is out of range for a vocabulary of {vocab_size}")]
    IndexOutOfRange { index: usize, vocab_size: usize },

    /// Generation was requested but no successful training run
    /// has produced the artifacts it needs.
    #[error("no trained model found in '{0}', run `train` first")]
    ModelNotTrained(String),

    /// The checkpoint on disk was trained against a different
    /// vocabulary. Loading it anyway would silently reassign
    /// the meaning of every output index, so this is fatal.
    #[error("checkpoint expects a vocabulary of {expected} tokens, found {actual}")]
    VocabularyMismatch { expected: usize, actual: usize },

    /// The per-epoch loss stopped being a finite number.
    /// The last valid checkpoint on disk remains usable.
    #[error("training diverged at epoch {epoch} (loss = {loss})")]
    TrainingDiverged { epoch: usize, loss: f64 },
}
