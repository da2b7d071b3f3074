// ============================================================
// Layer 6 — Pretrained Encoder Bundle
// ============================================================
// Resolves the externally supplied pretrained encoder artifacts.
// A bundle directory holds exactly three files:
//
//   pretrained/
//     encoder_config.json   ← architecture (vocab size, d_model,
//                             layers, heads, d_ff, dropout, max
//                             positions)
//     encoder.mpk.gz        ← trunk weights as a Burn record
//     vocab.txt             ← WordPiece vocabulary, one token per
//                             line, id = line number
//
// The config file is plain serde JSON of EncoderConfig, and the
// checkpoint is a CompactRecorder record of TextEncoder — the
// same formats this repo itself writes, so a bundle can be
// produced by any converter that speaks them.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{Context, Result};
use std::{fs, path::PathBuf};
use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::ml::model::{EncoderConfig, TextEncoder};

pub struct PretrainedBundle {
    dir: PathBuf,
}

impl PretrainedBundle {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// The architecture description file.
    pub fn config_path(&self) -> PathBuf {
        self.dir.join("encoder_config.json")
    }

    /// The trunk-weights record, without the recorder's extension.
    pub fn checkpoint_path(&self) -> PathBuf {
        self.dir.join("encoder")
    }

    /// The vocabulary file for the tokenizer.
    pub fn vocab_path(&self) -> PathBuf {
        self.dir.join("vocab.txt")
    }

    /// Read the encoder architecture from the bundle.
    pub fn load_config(&self) -> Result<EncoderConfig> {
        let path = self.config_path();
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read pretrained encoder config '{}'. \
                 Does the bundle directory exist?",
                path.display()
            )
        })?;
        let cfg: EncoderConfig = serde_json::from_str(&json)
            .with_context(|| format!("'{}' is not a valid encoder config", path.display()))?;

        tracing::info!(
            "Pretrained encoder: {} layers, d_model={}, vocab={}",
            cfg.num_layers,
            cfg.d_model,
            cfg.vocab_size,
        );
        Ok(cfg)
    }

    /// Load the pretrained trunk weights into a freshly built encoder.
    ///
    /// The encoder must have been built from this bundle's config —
    /// the record is type-checked against the module structure and
    /// loading fails on any architecture mismatch.
    pub fn load_encoder<B: Backend>(
        &self,
        encoder: TextEncoder<B>,
        device:  &B::Device,
    ) -> Result<TextEncoder<B>> {
        let path = self.checkpoint_path();

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .with_context(|| {
                format!(
                    "Cannot load pretrained encoder weights '{}'. \
                     The bundle must supply the checkpoint file.",
                    path.display()
                )
            })?;

        tracing::info!("Pretrained encoder weights loaded from '{}'", path.display());
        Ok(encoder.load_record(record))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bundle_paths() {
        let bundle = PretrainedBundle::new("pretrained");
        assert!(bundle.config_path().ends_with("encoder_config.json"));
        assert!(bundle.checkpoint_path().ends_with("encoder"));
        assert!(bundle.vocab_path().ends_with("vocab.txt"));
    }

    #[test]
    fn test_load_config_round_trip() {
        let dir = std::env::temp_dir().join("pretrained_bundle_test");
        fs::create_dir_all(&dir).unwrap();

        let cfg = EncoderConfig::new(21128, 512, 768, 12, 12, 3072, 0.1);
        let mut f = fs::File::create(dir.join("encoder_config.json")).unwrap();
        f.write_all(serde_json::to_string(&cfg).unwrap().as_bytes()).unwrap();

        let bundle = PretrainedBundle::new(dir.to_str().unwrap());
        let loaded = bundle.load_config().unwrap();
        assert_eq!(loaded.vocab_size, 21128);
        assert_eq!(loaded.num_layers, 12);
        assert_eq!(loaded.d_model, 768);
    }

    #[test]
    fn test_missing_config_names_the_path() {
        let bundle = PretrainedBundle::new("no/such/bundle");
        let err = bundle.load_config().unwrap_err();
        assert!(format!("{err:#}").contains("encoder_config.json"));
    }
}
