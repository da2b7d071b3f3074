use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::domain::aspect;

/// One fully tokenised, padded and label-encoded training sample.
/// Sequence format: [CLS] review text [SEP] [PAD]...
/// Labels are class indices (0/1/2), one per aspect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSample {
    pub token_ids:      Vec<u32>,
    pub segment_ids:    Vec<u32>,
    pub attention_mask: Vec<u32>,
    pub labels:         [u8; aspect::COUNT],
}

impl ReviewSample {
    pub fn seq_len(&self) -> usize {
        self.token_ids.len()
    }

    /// Number of non-padding positions.
    pub fn real_token_count(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

pub struct ReviewDataset {
    samples: Vec<ReviewSample>,
}

impl ReviewDataset {
    pub fn new(samples: Vec<ReviewSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<ReviewSample> for ReviewDataset {
    fn get(&self, index: usize) -> Option<ReviewSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
