// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `generate`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};

use crate::application::generate_use_case::GenerateConfig;
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train the note model on a corpus of .mid files
    Train(TrainArgs),

    /// Generate a new .mid file from the trained model
    Generate(GenerateArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Glob pattern matching the .mid files to train on
    #[arg(long, default_value = "datasets/*.mid")]
    pub corpus: String,

    /// Directory for the model artifacts (notes, vocabulary,
    /// config, checkpoints, metrics)
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Length of the rolling context window, in tokens
    #[arg(long, default_value_t = 100)]
    pub window_len: usize,

    /// Number of windows processed together in one forward pass
    #[arg(long, default_value_t = 128)]
    pub batch_size: usize,

    /// Number of full passes through the training windows
    #[arg(long, default_value_t = 200)]
    pub epochs: usize,

    /// Adam learning rate
    #[arg(long, default_value_t = 1e-3)]
    pub lr: f64,

    /// Hidden size of each LSTM layer
    #[arg(long, default_value_t = 512)]
    pub hidden_size: usize,

    /// Size of the dense layer between the LSTMs and the output
    #[arg(long, default_value_t = 256)]
    pub dense_size: usize,

    /// Dropout probability applied during training
    #[arg(long, default_value_t = 0.3)]
    pub dropout: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            corpus_glob: a.corpus,
            model_dir: a.model_dir,
            window_len: a.window_len,
            batch_size: a.batch_size,
            epochs: a.epochs,
            lr: a.lr,
            hidden_size: a.hidden_size,
            dense_size: a.dense_size,
            dropout: a.dropout,
            // Filled in from the built vocabulary once training starts
            vocab_size: 0,
        }
    }
}

/// All arguments for the `generate` command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Directory with the artifacts of a previous `train` run
    #[arg(long, default_value = "models")]
    pub model_dir: String,

    /// Directory the generated .mid file is written into
    #[arg(long, default_value = "output")]
    pub output_dir: String,

    /// Number of tokens to generate
    #[arg(long, default_value_t = 500)]
    pub steps: usize,

    /// RNG seed for reproducible seed-window selection
    #[arg(long)]
    pub seed: Option<u64>,
}

impl From<GenerateArgs> for GenerateConfig {
    fn from(a: GenerateArgs) -> Self {
        GenerateConfig {
            model_dir: a.model_dir,
            output_dir: a.output_dir,
            steps: a.steps,
            seed: a.seed,
        }
    }
}
