// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full fine-tuning pipeline in order:
//
//   Step 1: Load labelled reviews     (Layer 4 - data)
//   Step 2: Clean the text            (Layer 4 - data)
//   Step 3: Encode labels             (Layer 4 - data)
//   Step 4: Build tokenizer           (Layer 6 - infra)
//   Step 5: Encode token sequences    (Layer 4 - data)
//   Step 6: Split train/validation    (Layer 4 - data)
//   Step 7: Build datasets            (Layer 4 - data)
//   Step 8: Save config               (Layer 6 - infra)
//   Step 9: Run fine-tuning loop      (Layer 5 - ml)
//
// Reference: Burn Book §5 (Training)

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::ReviewDataset,
    dataset::ReviewSample,
    encoding::SequenceEncoder,
    labels,
    loader::CsvReviewLoader,
    preprocessor::Preprocessor,
    splitter::split_train_val,
};
use crate::domain::aspect;
use crate::domain::review::Review;
use crate::domain::traits::ReviewSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    pretrained::PretrainedBundle,
    tokenizer_store::TokenizerStore,
};
use crate::ml::trainer::run_training;

// ─── Training Configuration ──────────────────────────────────────────────────
// All run parameters for a fine-tuning pass.
// Serialisable so it can be saved to disk and reloaded for scoring.
// The encoder architecture itself is NOT here — it belongs to the
// pretrained bundle's own config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    pub data_file:      String,
    pub model_dir:      String,
    pub checkpoint_dir: String,
    pub max_seq_len:    usize,
    pub batch_size:     usize,
    pub epochs:         usize,
    pub lr:             f64,
    pub head_dropout:   f64,
    pub train_fraction: f64,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            data_file:      "data/reviews.csv".to_string(),
            model_dir:      "pretrained".to_string(),
            checkpoint_dir: "checkpoints".to_string(),
            max_seq_len:    256,
            batch_size:     1,
            epochs:         5,
            lr:             1e-5,
            head_dropout:   0.5,
            train_fraction: 0.8,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
// Owns the config and runs the full fine-tuning pipeline.
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    /// Create a new TrainUseCase with the given configuration
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full fine-tuning pipeline end to end
    pub fn execute(&self) -> Result<()> {
        let cfg = &self.config;

        // ── Step 1: Load the labelled review corpus ───────────────────────────
        tracing::info!("Loading reviews from '{}'", cfg.data_file);
        let loader  = CsvReviewLoader::new(&cfg.data_file);
        let reviews = loader.load_all()?;
        if reviews.is_empty() {
            bail!("'{}' contains no reviews — nothing to train on", cfg.data_file);
        }

        // ── Step 2: Clean / normalise text ────────────────────────────────────
        // Removes whitespace variants, control characters, etc.
        let preprocessor = Preprocessor::new();
        let clean_texts: Vec<String> = reviews
            .iter()
            .map(|r| preprocessor.clean(&r.text))
            .collect();

        // ── Step 3: Encode labels ─────────────────────────────────────────────
        // Shift -1/0/+1 to class indices 0/1/2 and stop on the first
        // out-of-range value, naming its row.
        let encoded_labels = encode_all_labels(&reviews)?;

        // ── Step 4: Build / load tokenizer ────────────────────────────────────
        // The vocabulary comes from the pretrained bundle; the built
        // tokenizer is persisted in the checkpoint directory so scoring
        // sees the exact same token ids.
        let bundle    = PretrainedBundle::new(&cfg.model_dir);
        let tok_store = TokenizerStore::new(&cfg.checkpoint_dir);
        let tokenizer = tok_store.load_or_build(&bundle.vocab_path())?;

        // ── Step 5: Encode token sequences ────────────────────────────────────
        // [CLS] text [SEP] + padding, fixed to max_seq_len, with
        // segment ids and attention mask.
        let seq_encoder = SequenceEncoder::new(tokenizer, cfg.max_seq_len)?;
        let samples = build_samples(&clean_texts, &encoded_labels, &seq_encoder)?;
        tracing::info!("Built {} training samples", samples.len());

        // ── Step 6: Train / validation split ──────────────────────────────────
        // Shuffle and split so checkpointing is driven by unseen data
        let (train_samples, val_samples) = split_train_val(samples, cfg.train_fraction);
        tracing::info!(
            "Split: {} train, {} validation",
            train_samples.len(),
            val_samples.len()
        );
        if train_samples.is_empty() || val_samples.is_empty() {
            bail!(
                "Corpus too small for a {}/{} split — need at least one sample on each side",
                (cfg.train_fraction * 100.0) as usize,
                100 - (cfg.train_fraction * 100.0) as usize,
            );
        }

        // ── Step 7: Build Burn datasets ───────────────────────────────────────
        // ReviewDataset implements Burn's Dataset trait so the DataLoader
        // can call .get(index) and .len() on it
        let train_dataset = ReviewDataset::new(train_samples);
        let val_dataset   = ReviewDataset::new(val_samples);

        // ── Step 8: Save config for scoring ───────────────────────────────────
        // The scorer needs the bundle location and sequence length to
        // rebuild the same model and input pipeline
        let ckpt_manager = CheckpointManager::new(&cfg.checkpoint_dir);
        ckpt_manager.save_config(cfg)?;

        // ── Step 9: Run fine-tuning loop (Layer 5) ────────────────────────────
        run_training(cfg, train_dataset, val_dataset, ckpt_manager, &bundle)?;

        Ok(())
    }
}

// ─── Sample Construction ─────────────────────────────────────────────────────
/// Shift every review's raw labels into class indices, reporting the
/// corpus row of the first invalid value.
fn encode_all_labels(reviews: &[Review]) -> Result<Vec<[u8; aspect::COUNT]>> {
    reviews
        .iter()
        .enumerate()
        .map(|(idx, review)| {
            // Row 1 is the header, so the first review sits on row 2
            labels::encode_labels(&review.labels, idx + 2)
        })
        .collect()
}

/// Pair each cleaned text with its encoded labels and tokenise.
fn build_samples(
    texts:          &[String],
    encoded_labels: &[[u8; aspect::COUNT]],
    seq_encoder:    &SequenceEncoder,
) -> Result<Vec<ReviewSample>> {
    let mut samples = Vec::with_capacity(texts.len());

    for (text, labels) in texts.iter().zip(encoded_labels.iter()) {
        let seq = seq_encoder.encode(text)?;
        samples.push(ReviewSample {
            token_ids:      seq.token_ids,
            segment_ids:    seq.segment_ids,
            attention_mask: seq.attention_mask,
            labels:         *labels,
        });
    }

    Ok(samples)
}
