// ============================================================
// Layer 5 — Scorer
// ============================================================
// Loads the best checkpoint and scores unseen review text along
// all seven aspects in one forward pass.

use anyhow::Result;
use burn::prelude::*;
use tokenizers::Tokenizer;

use crate::data::encoding::SequenceEncoder;
use crate::domain::aspect::{Aspect, AspectScore, Polarity, POLARITY_CLASSES};
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::pretrained::PretrainedBundle;
use crate::ml::model::{SentimentModel, SentimentModelConfig};

type ScoreBackend = burn::backend::Wgpu;

pub struct Scorer {
    model:   SentimentModel<ScoreBackend>,
    encoder: SequenceEncoder,
    device:  burn::backend::wgpu::WgpuDevice,
}

impl Scorer {
    /// Rebuild the trained model from its checkpoint.
    ///
    /// The architecture comes from the pretrained bundle's config file;
    /// the weights (trunk and heads together) come from the best
    /// checkpoint written during training. Dropout is zeroed — scoring
    /// must be deterministic.
    pub fn from_checkpoint(
        ckpt_manager: &CheckpointManager,
        pretrained:   &PretrainedBundle,
        tokenizer:    Tokenizer,
        max_seq_len:  usize,
    ) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();

        let mut encoder_cfg = pretrained.load_config()?;
        encoder_cfg.dropout = 0.0;

        let model_cfg = SentimentModelConfig::new(encoder_cfg).with_head_dropout(0.0);
        let model: SentimentModel<ScoreBackend> = model_cfg.init(&device);
        let model = ckpt_manager.load_model(model, &device)?;
        tracing::info!("Model loaded from checkpoint");

        let encoder = SequenceEncoder::new(tokenizer, max_seq_len)?;

        Ok(Self { model, encoder, device })
    }

    /// Score one review. Returns one entry per aspect, in
    /// Aspect::ALL order.
    pub fn predict(&self, text: &str) -> Result<Vec<AspectScore>> {
        let seq = self.encoder.encode(text)?;

        // Single-sample batch: [1, seq_len] tensors
        let to_tensor = |values: &[u32]| {
            let flat: Vec<i32> = values.iter().map(|&x| x as i32).collect();
            Tensor::<ScoreBackend, 1, Int>::from_ints(flat.as_slice(), &self.device)
                .unsqueeze::<2>()
        };

        let token_ids      = to_tensor(&seq.token_ids);
        let segment_ids    = to_tensor(&seq.segment_ids);
        let attention_mask = to_tensor(&seq.attention_mask);

        let logits = self.model.forward(token_ids, segment_ids, attention_mask);

        let mut scores = Vec::with_capacity(Aspect::ALL.len());
        for (aspect, head_logits) in Aspect::ALL.iter().zip(logits) {
            // Softmax over the three polarity classes
            let probs_vec: Vec<f32> = burn::tensor::activation::softmax(head_logits, 1)
                .reshape([POLARITY_CLASSES])
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow::anyhow!("Cannot read probabilities: {e:?}"))?;

            if probs_vec.len() != POLARITY_CLASSES {
                anyhow::bail!(
                    "Head '{}' produced {} probabilities, expected {}",
                    aspect.key(),
                    probs_vec.len(),
                    POLARITY_CLASSES,
                );
            }

            let mut probabilities = [0.0f32; POLARITY_CLASSES];
            probabilities.copy_from_slice(&probs_vec);

            // Winning class = predicted polarity
            let (best_class, &confidence) = probabilities
                .iter()
                .enumerate()
                .max_by(|a, b| a.1.total_cmp(b.1))
                .expect("polarity class array is non-empty");

            let polarity = Polarity::from_class(best_class)
                .expect("argmax over 3 classes is in range");

            tracing::debug!(
                "{}: {} ({:.4})",
                aspect.key(),
                polarity.as_str(),
                confidence,
            );

            scores.push(AspectScore {
                aspect: *aspect,
                polarity,
                confidence,
                probabilities,
            });
        }

        Ok(scores)
    }
}
