// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Two commands are supported:
//   1. `train` — fine-tunes the model on a labelled review CSV
//   2. `score` — loads a checkpoint and scores one review
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

// Declare the commands submodule
pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, ScoreArgs, TrainArgs};

/// The main CLI struct — clap reads the fields and generates
/// argument parsing code automatically via the Parser derive macro.
#[derive(Parser, Debug)]
#[command(
    name = "review-sentiment",
    version = "0.1.0",
    about = "Fine-tune a transformer encoder on labelled e-commerce reviews, \
             then score new reviews along seven sentiment aspects."
)]
pub struct Cli {
    /// The subcommand to run (train or score)
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    /// This keeps the CLI layer thin — it only routes, never computes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args) => Self::run_train(args),
            Commands::Score(args) => Self::run_score(args),
        }
    }

    /// Handles the `train` subcommand.
    /// Converts CLI args into a TrainConfig and hands off to Layer 2.
    fn run_train(args: TrainArgs) -> Result<()> {
        use crate::application::train_use_case::TrainUseCase;

        tracing::info!("Starting fine-tuning on corpus: {}", args.data_file);

        // Convert CLI args → application config (separates presentation from domain)
        let use_case = TrainUseCase::new(args.into());
        use_case.execute()?;

        println!("Training complete. Best checkpoint saved.");
        Ok(())
    }

    /// Handles the `score` subcommand.
    /// Loads the model from checkpoint and prints one line per aspect.
    fn run_score(args: ScoreArgs) -> Result<()> {
        use crate::application::score_use_case::ScoreUseCase;
        use crate::domain::traits::SentimentScorer;

        // Build the use case from the checkpoint directory
        let use_case = ScoreUseCase::new(args.checkpoint_dir.clone())?;

        // Run inference and print the per-aspect report
        let scores = use_case.score(&args.text)?;

        println!("\n{:<24} {:<10} confidence", "aspect", "polarity");
        for s in &scores {
            println!(
                "{:<24} {:<10} {:>5.1}%",
                s.aspect.label(),
                s.polarity.as_str(),
                s.confidence * 100.0,
            );
        }
        Ok(())
    }
}
