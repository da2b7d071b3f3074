// ============================================================
// Layer 4 — Review Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<ReviewSample>
// into GPU-ready tensors.
//
// How batching works here:
//   Input:  Vec of N ReviewSamples, each with sequences of length S
//   Output: ReviewBatch with [N, S] tensors for token ids, segment
//           ids and attention mask, plus an [N, 7] label tensor
//           holding one class index per aspect.
//
//   We flatten each field into one long Vec, then reshape:
//   [s1_t1, s1_t2, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
//
// All sequences were already padded to the same length by the
// SequenceEncoder, so no dynamic padding is needed here.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::ReviewSample;
use crate::domain::aspect;

// ─── ReviewBatch ──────────────────────────────────────────────────────────────
/// A batch of review samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. Wgpu, NdArray) —
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct ReviewBatch<B: Backend> {
    /// Token ID sequences — shape: [batch_size, seq_len]
    pub token_ids: Tensor<B, 2, Int>,

    /// Segment ID sequences — shape: [batch_size, seq_len]
    /// All zeros for single-sentence review input
    pub segment_ids: Tensor<B, 2, Int>,

    /// Attention masks — shape: [batch_size, seq_len]
    /// 1 = real token, 0 = padding
    pub attention_mask: Tensor<B, 2, Int>,

    /// Ground truth class indices — shape: [batch_size, aspects]
    /// Column `i` holds the label for `Aspect::ALL[i]`
    pub labels: Tensor<B, 2, Int>,
}

// ─── ReviewBatcher ────────────────────────────────────────────────────────────
/// The batcher struct — holds the target device so tensors
/// are created on the correct GPU/CPU.
#[derive(Clone, Debug)]
pub struct ReviewBatcher<B: Backend> {
    /// The device to create tensors on (e.g. GPU index 0)
    pub device: B::Device,
}

impl<B: Backend> ReviewBatcher<B> {
    /// Create a new batcher for the given device
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

// ─── Burn Batcher Trait Implementation ────────────────────────────────────────
// This is what makes ReviewBatcher work with Burn's DataLoader.
// The DataLoader calls .batch(items) with each mini-batch of samples.
impl<B: Backend> Batcher<ReviewSample, ReviewBatch<B>> for ReviewBatcher<B> {
    fn batch(&self, items: Vec<ReviewSample>) -> ReviewBatch<B> {
        let batch_size = items.len();
        // All sequences have the same length (pre-padded)
        let seq_len    = items[0].token_ids.len();

        // Flatten each field from Vec<Vec<u32>> to Vec<i32>
        // (Burn uses i32 for Int tensors)
        let token_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.token_ids.iter().map(|&x| x as i32))
            .collect();

        let segment_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.segment_ids.iter().map(|&x| x as i32))
            .collect();

        let mask_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.attention_mask.iter().map(|&x| x as i32))
            .collect();

        // Labels: one row of 7 class indices per sample
        let label_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.labels.iter().map(|&x| x as i32))
            .collect();

        // Tensor::from_ints creates a 1D tensor from a slice,
        // then .reshape() gives it the correct 2D shape
        let token_ids = Tensor::<B, 1, Int>::from_ints(
            token_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let segment_ids = Tensor::<B, 1, Int>::from_ints(
            segment_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let attention_mask = Tensor::<B, 1, Int>::from_ints(
            mask_flat.as_slice(), &self.device
        ).reshape([batch_size, seq_len]);

        let labels = Tensor::<B, 1, Int>::from_ints(
            label_flat.as_slice(), &self.device
        ).reshape([batch_size, aspect::COUNT]);

        ReviewBatch {
            token_ids,
            segment_ids,
            attention_mask,
            labels,
        }
    }
}
