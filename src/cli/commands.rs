// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands: `train` and `score`
// and all their configurable flags.
//
// clap's derive macros automatically generate:
//   - help text (--help)
//   - error messages for missing args
//   - type conversion (string → usize, f64, etc.)
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

/// The two top-level subcommands available to the user
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fine-tune the sentiment model on a labelled review corpus
    Train(TrainArgs),

    /// Score review text along all seven aspects using a trained checkpoint
    Score(ScoreArgs),
}

/// All arguments for the `train` command.
/// Each field becomes a --flag on the command line.
#[derive(Args, Debug)]
pub struct TrainArgs {
    /// CSV review corpus: first column text, then seven ternary
    /// label columns (-1/0/1), with a header row
    #[arg(long, default_value = "data/reviews.csv")]
    pub data_file: String,

    /// Directory with the pretrained encoder bundle:
    /// encoder_config.json, encoder checkpoint, vocab.txt
    #[arg(long, default_value = "pretrained")]
    pub model_dir: String,

    /// Directory to save model checkpoints, tokenizer and metrics
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,

    /// Fixed number of token positions per review
    /// Format: [CLS] review text [SEP] + padding
    #[arg(long, default_value_t = 256)]
    pub max_seq_len: usize,

    /// Number of samples processed together in one forward pass
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Number of full passes through the training data
    #[arg(long, default_value_t = 5)]
    pub epochs: usize,

    /// How fast the model learns — fine-tuning a pretrained trunk
    /// wants a much smaller rate than training from scratch
    #[arg(long, default_value_t = 1e-5)]
    pub lr: f64,

    /// Dropout on the pooled representation, applied per head
    #[arg(long, default_value_t = 0.5)]
    pub head_dropout: f64,

    /// Fraction of samples used for training; the rest form the
    /// validation set that gates checkpointing
    #[arg(long, default_value_t = 0.8)]
    pub train_fraction: f64,
}

/// Convert CLI TrainArgs into the application-layer TrainConfig.
/// This is the boundary between Layer 1 and Layer 2 —
/// the application layer never sees clap types.
impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_file:      a.data_file,
            model_dir:      a.model_dir,
            checkpoint_dir: a.checkpoint_dir,
            max_seq_len:    a.max_seq_len,
            batch_size:     a.batch_size,
            epochs:         a.epochs,
            lr:             a.lr,
            head_dropout:   a.head_dropout,
            train_fraction: a.train_fraction,
        }
    }
}

/// All arguments for the `score` command
#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// The review text to score
    #[arg(long)]
    pub text: String,

    /// Directory where checkpoints were saved during training
    #[arg(long, default_value = "checkpoints")]
    pub checkpoint_dir: String,
}
