// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train`    — trains the note model on a .mid corpus
//   2. `generate` — loads the best checkpoint and writes a
//                   freshly generated .mid file
//
// Progress milestones from the use cases are printed to stdout
// here; a server front end would relay the same strings over
// its own channel instead.
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, GenerateArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "midi-composer",
    version = "0.1.0",
    about = "Train an LSTM on MIDI files, then generate new music from it."
)]
pub struct Cli {
    /// The subcommand to run (train or generate)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Generate(args) => Self::run_generate(args),
        }
    }

    /// Handles the `train` subcommand.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting training on corpus: {}", args.corpus);

        let progress = |milestone: &str| println!("==> {milestone}");
        let use_case = TrainUseCase::new(args.into());
        use_case.execute(&progress)?;

        println!("Training complete. Best checkpoint saved.");
        Ok(())
    }

    /// Handles the `generate` subcommand.
    fn run_generate(args: GenerateArgs) -> Result<()> {
        use crate::application::generate_use_case::GenerateUseCase;

        let progress = |milestone: &str| println!("==> {milestone}");
        let use_case = GenerateUseCase::new(args.into());
        let filename = use_case.execute(&progress)?;

        println!("\nGenerated: {filename}");
        Ok(())
    }
}
