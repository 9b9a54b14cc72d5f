// ============================================================
// Layer 2 — GenerateUseCase
// ============================================================
// Orchestrates one generation run against the artifacts of the
// most recent successful training run:
//
//   Step 1: Load notes + vocabulary     (Layer 6 - infra)
//   Step 2: Rebuild the seed windows    (Layer 4 - data)
//   Step 3: Load the best checkpoint    (Layer 5 - ml)
//   Step 4: Greedy sampling loop        (Layer 5 - ml)
//   Step 5: Encode the MIDI file        (Layer 4 - data)
//
// Seeding uses the same windowing as training: a uniformly
// random window from the persisted note stream becomes the
// initial rolling context. With --seed given, the selection is
// reproducible; everything after the selection is deterministic
// either way, because decoding is greedy.
//
// The run is read-only with respect to every training artifact,
// so concurrent generation runs can share them safely. If any
// artifact is missing the run fails with ModelNotTrained before
// an output file is created.
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::Result;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::data::{encoder::MidiScoreWriter, windows::make_windows};
use crate::domain::traits::{ProgressSink, ScoreSink};
use crate::infra::{checkpoint::CheckpointManager, store::NoteStore};
use crate::ml::generator::Composer;

// ─── Generation Configuration ────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Directory holding the training artifacts
    pub model_dir: String,
    /// Directory the generated .mid file is written into
    pub output_dir: String,
    /// Number of tokens to generate
    pub steps: usize,
    /// Optional RNG seed for reproducible seed-window selection
    pub seed: Option<u64>,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            model_dir: "models".to_string(),
            output_dir: "output".to_string(),
            steps: 500,
            seed: None,
        }
    }
}

// ─── GenerateUseCase ──────────────────────────────────────────────────────────
pub struct GenerateUseCase {
    config: GenerateConfig,
}

impl GenerateUseCase {
    pub fn new(config: GenerateConfig) -> Self {
        Self { config }
    }

    /// Execute the full generation pipeline and return the name of
    /// the written file.
    pub fn execute(&self, progress: &dyn ProgressSink) -> Result<String> {
        let writer = MidiScoreWriter::new(&self.config.output_dir);
        self.run(&writer, progress)
    }

    /// The pipeline itself, against any ScoreSink. Tests substitute
    /// an in-memory sink here.
    pub fn run(&self, sink: &dyn ScoreSink, progress: &dyn ProgressSink) -> Result<String> {
        let cfg = &self.config;

        // ── Step 1: Load the training artifacts ───────────────────────────────
        progress.notify("reading notes");
        let store = NoteStore::new(&cfg.model_dir);
        let notes = store.load_notes()?;
        let vocab = store.load_vocab()?;
        let ckpt_manager = CheckpointManager::new(&cfg.model_dir);
        let train_cfg = ckpt_manager.load_config()?;

        // ── Step 2: Rebuild the seed windows ──────────────────────────────────
        // Identical windowing to training, over the identical stream,
        // so any window is a context the model has actually seen.
        progress.notify("preparing sequences");
        let windows = make_windows(&notes, &vocab, train_cfg.window_len)?;

        // ── Step 3: Load the best checkpoint ──────────────────────────────────
        progress.notify("creating network");
        let composer = Composer::from_checkpoint(&ckpt_manager, vocab)?;

        // ── Step 4: Greedy sampling from a random seed window ─────────────────
        progress.notify("generating notes");
        let mut rng: StdRng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let start = rng.gen_range(0..windows.len());
        let seed_window = windows[start].indices.clone();
        let tokens = composer.compose(seed_window, cfg.steps)?;

        // ── Step 5: Encode and persist the score ──────────────────────────────
        progress.notify("creating midi");
        let filename = sink.write(&tokens)?;
        tracing::info!("Generated '{}' ({} tokens)", filename, tokens.len());

        Ok(filename)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::{TrainConfig, TrainUseCase};
    use crate::data::vocab::Vocabulary;
    use crate::domain::error::ComposerError;
    use crate::domain::traits::{NoteSource, SilentProgress};
    use std::cell::RefCell;
    use std::collections::HashSet;

    struct FixedSource(Vec<String>);

    impl NoteSource for FixedSource {
        fn load(&self) -> Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    /// Records what it is asked to write instead of touching disk.
    struct CaptureSink {
        written: RefCell<Vec<Vec<String>>>,
    }

    impl CaptureSink {
        fn new() -> Self {
            Self { written: RefCell::new(Vec::new()) }
        }
    }

    impl ScoreSink for CaptureSink {
        fn write(&self, tokens: &[String]) -> Result<String> {
            self.written.borrow_mut().push(tokens.to_vec());
            Ok("capture.mid".to_string())
        }
    }

    /// The 120-token corpus: C4, E4, C-major chord, G4, repeated.
    fn corpus() -> Vec<String> {
        ["C4", "E4", "C4.E4.G4", "G4"]
            .iter()
            .cycle()
            .take(120)
            .map(|t| t.to_string())
            .collect()
    }

    fn train(dir: &std::path::Path) {
        let cfg = TrainConfig {
            model_dir: dir.display().to_string(),
            window_len: 100,
            batch_size: 8,
            epochs: 2,
            hidden_size: 16,
            dense_size: 16,
            lr: 1e-2,
            ..TrainConfig::default()
        };
        TrainUseCase::new(cfg)
            .run(&FixedSource(corpus()), &SilentProgress)
            .unwrap();
    }

    #[test]
    fn test_end_to_end_train_then_generate() {
        let dir = tempfile::tempdir().unwrap();

        // The corpus yields exactly 4 sorted tokens and 20 windows
        let stream = corpus();
        let vocab = Vocabulary::build(&stream);
        assert_eq!(vocab.tokens(), &["C4", "C4.E4.G4", "E4", "G4"]);
        assert_eq!(
            make_windows(&stream, &vocab, 100).unwrap().len(),
            20
        );

        train(dir.path());

        let gen_cfg = GenerateConfig {
            model_dir: dir.path().display().to_string(),
            steps: 10,
            seed: Some(7),
            ..GenerateConfig::default()
        };
        let sink = CaptureSink::new();
        let filename = GenerateUseCase::new(gen_cfg)
            .run(&sink, &SilentProgress)
            .unwrap();
        assert_eq!(filename, "capture.mid");

        // Exactly 10 tokens, all drawn from the vocabulary
        let written = sink.written.borrow();
        assert_eq!(written.len(), 1);
        assert_eq!(written[0].len(), 10);
        let alphabet: HashSet<&str> = ["C4", "C4.E4.G4", "E4", "G4"].into_iter().collect();
        assert!(written[0].iter().all(|t| alphabet.contains(t.as_str())));
    }

    #[test]
    fn test_generation_is_reproducible_with_a_fixed_seed() {
        let dir = tempfile::tempdir().unwrap();
        train(dir.path());

        let gen_cfg = GenerateConfig {
            model_dir: dir.path().display().to_string(),
            steps: 10,
            seed: Some(42),
            ..GenerateConfig::default()
        };

        let first = CaptureSink::new();
        let second = CaptureSink::new();
        GenerateUseCase::new(gen_cfg.clone()).run(&first, &SilentProgress).unwrap();
        GenerateUseCase::new(gen_cfg).run(&second, &SilentProgress).unwrap();

        assert_eq!(*first.written.borrow(), *second.written.borrow());
    }

    #[test]
    fn test_progress_milestones_reach_the_sink() {
        let dir = tempfile::tempdir().unwrap();
        train(dir.path());

        let milestones = RefCell::new(Vec::new());
        let progress = |m: &str| milestones.borrow_mut().push(m.to_string());

        let gen_cfg = GenerateConfig {
            model_dir: dir.path().display().to_string(),
            steps: 5,
            seed: Some(1),
            ..GenerateConfig::default()
        };
        GenerateUseCase::new(gen_cfg)
            .run(&CaptureSink::new(), &progress)
            .unwrap();

        let seen = milestones.borrow();
        assert_eq!(
            *seen,
            vec![
                "reading notes",
                "preparing sequences",
                "creating network",
                "generating notes",
                "creating midi",
            ]
        );
    }

    #[test]
    fn test_generating_without_training_fails_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let gen_cfg = GenerateConfig {
            model_dir: dir.path().display().to_string(),
            ..GenerateConfig::default()
        };

        let sink = CaptureSink::new();
        let err = GenerateUseCase::new(gen_cfg)
            .run(&sink, &SilentProgress)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ComposerError>(),
            Some(ComposerError::ModelNotTrained(_))
        ));
        assert!(sink.written.borrow().is_empty());
    }
}
