// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load .mid corpus            (Layer 4 - data)
//   Step 2: Build vocabulary            (Layer 4 - data)
//   Step 3: Persist notes + vocabulary  (Layer 6 - infra)
//   Step 4: Cut training windows        (Layer 4 - data)
//   Step 5: Save config                 (Layer 6 - infra)
//   Step 6: Run training loop           (Layer 5 - ml)
//
// Step 3 happens before a single epoch runs, on purpose: the
// generator cannot function without the vocabulary, so a crash
// halfway through training must not lose it. A failed training
// run leaves the notes, the vocabulary and every checkpoint
// saved so far in place and usable.
//
// An empty corpus fails the run before anything is persisted.
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::WindowDataset,
    loader::MidiCorpusLoader,
    vocab::Vocabulary,
    windows::make_windows,
};
use crate::domain::error::ComposerError;
use crate::domain::traits::{NoteSource, ProgressSink};
use crate::infra::{checkpoint::CheckpointManager, metrics::MetricsLogger, store::NoteStore};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All hyperparameters for a training run. Serialisable so it can be
// saved next to the checkpoints and reloaded for generation, which
// needs the exact architecture and window length to rebuild the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub corpus_glob: String,
    pub model_dir: String,
    pub window_len: usize,
    pub batch_size: usize,
    pub epochs: usize,
    pub lr: f64,
    pub hidden_size: usize,
    pub dense_size: usize,
    pub dropout: f64,
    /// Set from the built vocabulary when the run starts; the
    /// persisted value guards checkpoint loads against a vocabulary
    /// of a different size.
    pub vocab_size: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus_glob: "datasets/*.mid".to_string(),
            model_dir: "models".to_string(),
            window_len: 100,
            batch_size: 128,
            epochs: 200,
            lr: 1e-3,
            hidden_size: 512,
            dense_size: 256,
            dropout: 0.3,
            vocab_size: 0,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end against the
    /// configured MIDI corpus.
    pub fn execute(&self, progress: &dyn ProgressSink) -> Result<()> {
        let loader = MidiCorpusLoader::new(&self.config.corpus_glob);
        self.run(&loader, progress)
    }

    /// The pipeline itself, against any NoteSource. Tests substitute
    /// an in-memory source here.
    pub fn run(&self, source: &dyn NoteSource, progress: &dyn ProgressSink) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Ingest the corpus ─────────────────────────────────────────
        progress.notify("reading notes");
        tracing::info!("Loading corpus from '{}'", cfg.corpus_glob);
        let notes = source.load()?;
        if notes.is_empty() {
            return Err(ComposerError::EmptyCorpus(cfg.corpus_glob.clone()).into());
        }
        tracing::info!("Corpus has {} notes", notes.len());

        // ── Step 2: Build the vocabulary ──────────────────────────────────────
        let vocab = Vocabulary::build(&notes);
        tracing::info!("Vocabulary has {} distinct tokens", vocab.len());

        // ── Step 3: Persist the ingestion artifacts immediately ───────────────
        // The generator needs both, and a crash mid-training must not
        // lose them.
        let store = NoteStore::new(&cfg.model_dir);
        store.save_notes(&notes)?;
        store.save_vocab(&vocab)?;

        // ── Step 4: Cut the training windows ──────────────────────────────────
        progress.notify("preparing sequences");
        let windows = make_windows(&notes, &vocab, cfg.window_len)?;
        tracing::info!("Prepared {} training windows", windows.len());
        let dataset = WindowDataset::new(windows);

        // ── Step 5: Save the run config for generation ────────────────────────
        let mut run_cfg = cfg.clone();
        run_cfg.vocab_size = vocab.len();
        let ckpt_manager = CheckpointManager::new(&cfg.model_dir);
        ckpt_manager.save_config(&run_cfg)?;
        let metrics = MetricsLogger::new(&cfg.model_dir)?;

        // ── Step 6: Run the training loop (Layer 5) ───────────────────────────
        progress.notify("training network");
        run_training(&run_cfg, dataset, &ckpt_manager, &metrics, progress)?;

        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traits::SilentProgress;

    struct FixedSource(Vec<String>);

    impl NoteSource for FixedSource {
        fn load(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    fn tiny_config(dir: &std::path::Path) -> TrainConfig {
        TrainConfig {
            model_dir: dir.display().to_string(),
            window_len: 4,
            batch_size: 8,
            epochs: 1,
            hidden_size: 8,
            dense_size: 8,
            ..TrainConfig::default()
        }
    }

    #[test]
    fn test_empty_corpus_fails_before_persisting_anything() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = TrainUseCase::new(tiny_config(dir.path()));

        let err = use_case.run(&FixedSource(vec![]), &SilentProgress).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ComposerError>(),
            Some(ComposerError::EmptyCorpus(_))
        ));
        assert!(!dir.path().join("vocabulary.json").exists());
        assert!(!dir.path().join("notes.json").exists());
    }

    #[test]
    fn test_too_short_corpus_still_persists_ingestion_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = TrainUseCase::new(tiny_config(dir.path()));

        // 3 notes cannot fill a window of 4, but they are a valid corpus
        let source = FixedSource(vec!["C4".into(), "E4".into(), "G4".into()]);
        let err = use_case.run(&source, &SilentProgress).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ComposerError>(),
            Some(ComposerError::InsufficientData { tokens: 3, window: 4 })
        ));
        // The vocabulary survived the failed run
        assert!(dir.path().join("vocabulary.json").exists());
        assert!(dir.path().join("notes.json").exists());
    }

    #[test]
    fn test_training_persists_config_and_best_checkpoint() {
        let dir = tempfile::tempdir().unwrap();
        let use_case = TrainUseCase::new(tiny_config(dir.path()));

        let stream: Vec<String> = ["C4", "E4", "G4"]
            .iter()
            .cycle()
            .take(12)
            .map(|t| t.to_string())
            .collect();
        use_case.run(&FixedSource(stream), &SilentProgress).unwrap();

        let manager = CheckpointManager::new(dir.path());
        let saved = manager.load_config().unwrap();
        assert_eq!(saved.vocab_size, 3);

        let best = manager.best_checkpoint().unwrap();
        assert_eq!(best.epoch, 1);
        assert!(dir.path().join("metrics.csv").exists());
    }
}
