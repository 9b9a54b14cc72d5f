// ============================================================
// Layer 5 — Composer (Greedy Generation)
// ============================================================
// Loads the best checkpoint of the most recent training run and
// autoregressively extends a seed window:
//
//   normalize window → forward pass → softmax → argmax
//   → decode token → slide window by one → repeat
//
// Decoding is strictly greedy: the highest-probability index
// wins every step, first index wins ties. No temperature, no
// beam search, no sampling noise. Given the same seed window
// and the same parameters, two runs produce identical output,
// which is what makes generation reproducible and testable.
//
// The composer is read-only with respect to every training
// artifact: it owns a freshly loaded model per instance and
// mutates nothing on disk, so concurrent composers can share
// the same checkpoint directory safely.
//
// Reference: Burn Book §5 (Records)

use anyhow::Result;
use burn::prelude::*;

use crate::data::vocab::Vocabulary;
use crate::data::windows;
use crate::domain::error::ComposerError;
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::{ComposerModel, ComposerModelConfig};

pub type InferBackend = burn::backend::NdArray;

#[derive(Debug)]
pub struct Composer {
    model: ComposerModel<InferBackend>,
    vocab: Vocabulary,
    device: <InferBackend as Backend>::Device,
}

impl Composer {
    /// Rebuild the trained architecture from the persisted config and
    /// load the best checkpoint into it.
    ///
    /// The vocabulary size check comes first: weights trained against
    /// one vocabulary must never load against another, because every
    /// output index would silently change meaning.
    pub fn from_checkpoint(ckpt_manager: &CheckpointManager, vocab: Vocabulary) -> Result<Self> {
        let cfg = ckpt_manager.load_config()?;
        if cfg.vocab_size != vocab.len() {
            return Err(ComposerError::VocabularyMismatch {
                expected: cfg.vocab_size,
                actual: vocab.len(),
            }
            .into());
        }

        let device = Default::default();
        let model: ComposerModel<InferBackend> =
            ComposerModelConfig::new(vocab.len(), cfg.hidden_size, cfg.dense_size, cfg.dropout)
                .init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        Ok(Self { model, vocab, device })
    }

    /// One forward pass for a single window. Returns the softmax
    /// distribution over the vocabulary: non-negative, sums to 1,
    /// one probability per token.
    pub fn predict(&self, window: &[usize]) -> Result<Vec<f32>> {
        let scaled = windows::normalize(window, self.vocab.len());
        let inputs = Tensor::<InferBackend, 1>::from_floats(scaled.as_slice(), &self.device)
            .reshape([1, window.len(), 1]);

        let logits = self.model.forward(inputs);
        let probs = burn::tensor::activation::softmax(logits, 1);
        probs
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow::anyhow!("cannot read prediction: {e:?}"))
    }

    /// Extend the seed window by `steps` tokens with greedy decoding.
    /// The rolling window drops its oldest index and appends the
    /// prediction after every step; output length is always `steps`.
    pub fn compose(&self, seed: Vec<usize>, steps: usize) -> Result<Vec<String>> {
        let mut window = seed;
        let mut output = Vec::with_capacity(steps);

        for _ in 0..steps {
            let probs = self.predict(&window)?;
            let next = argmax(&probs);

            output.push(self.vocab.decode(next)?.to_string());

            window.remove(0);
            window.push(next);
        }

        Ok(output)
    }
}

/// Index of the largest value; first maximum wins ties, so the
/// result is deterministic.
fn argmax(probs: &[f32]) -> usize {
    let mut best = 0;
    for (i, &p) in probs.iter().enumerate() {
        if p > probs[best] {
            best = i;
        }
    }
    best
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use crate::ml::trainer::TrainBackend;

    #[test]
    fn test_argmax_first_max_wins_ties() {
        assert_eq!(argmax(&[0.1, 0.4, 0.4, 0.1]), 1);
        assert_eq!(argmax(&[0.9, 0.05, 0.05]), 0);
        assert_eq!(argmax(&[0.0]), 0);
    }

    /// Stores an untrained model as a checkpoint so the load path and
    /// the decoding loop can be exercised without a full training run.
    fn store_model(dir: &std::path::Path, vocab_size: usize) -> CheckpointManager {
        let manager = CheckpointManager::new(dir);

        let cfg = TrainConfig {
            vocab_size,
            hidden_size: 8,
            dense_size: 8,
            window_len: 4,
            ..TrainConfig::default()
        };
        manager.save_config(&cfg).unwrap();

        let device = Default::default();
        let model: ComposerModel<TrainBackend> =
            ComposerModelConfig::new(vocab_size, 8, 8, cfg.dropout).init(&device);
        manager.save_model(&model, 1, 99.0).unwrap();
        manager
    }

    fn small_vocab() -> Vocabulary {
        Vocabulary::build(&["C4".into(), "E4".into(), "G4".into()])
    }

    #[test]
    fn test_compose_is_deterministic_with_fixed_seed_window() {
        let dir = tempfile::tempdir().unwrap();
        let manager = store_model(dir.path(), 3);
        let composer = Composer::from_checkpoint(&manager, small_vocab()).unwrap();

        let a = composer.compose(vec![0, 1, 2, 0], 12).unwrap();
        let b = composer.compose(vec![0, 1, 2, 0], 12).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_compose_output_length_equals_steps() {
        let dir = tempfile::tempdir().unwrap();
        let manager = store_model(dir.path(), 3);
        let composer = Composer::from_checkpoint(&manager, small_vocab()).unwrap();

        for steps in [1, 7, 25] {
            assert_eq!(composer.compose(vec![0, 1, 2, 0], steps).unwrap().len(), steps);
        }
    }

    #[test]
    fn test_predict_returns_a_distribution() {
        let dir = tempfile::tempdir().unwrap();
        let manager = store_model(dir.path(), 3);
        let composer = Composer::from_checkpoint(&manager, small_vocab()).unwrap();

        let probs = composer.predict(&[0, 1, 2, 0]).unwrap();
        assert_eq!(probs.len(), 3);
        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_vocabulary_size_mismatch_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        // Checkpoint trained against 5 tokens, vocabulary has 3
        let manager = store_model(dir.path(), 5);

        let err = Composer::from_checkpoint(&manager, small_vocab()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ComposerError>(),
            Some(ComposerError::VocabularyMismatch { expected: 5, actual: 3 })
        ));
    }
}
