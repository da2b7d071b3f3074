// ============================================================
// Layer 2 — Score Use Case
// ============================================================
// Loads the fine-tuned model and scores one review along all
// seven sentiment aspects:
//   1. Load tokenizer and training config from the checkpoint dir
//   2. Rebuild the model from the pretrained bundle's architecture
//   3. Load the best checkpoint weights
//   4. Clean the text exactly like the training pipeline did
//   5. One forward pass, softmax per head

use anyhow::Result;

use crate::data::preprocessor::Preprocessor;
use crate::domain::aspect::AspectScore;
use crate::domain::traits::SentimentScorer;
use crate::infra::{
    checkpoint::CheckpointManager,
    pretrained::PretrainedBundle,
    tokenizer_store::TokenizerStore,
};
use crate::ml::scorer::Scorer;

pub struct ScoreUseCase {
    preprocessor: Preprocessor,
    scorer:       Scorer,
}

impl ScoreUseCase {
    /// Build the use case from a checkpoint directory.
    /// The pretrained bundle location and sequence length come from
    /// the config persisted by the training run.
    pub fn new(checkpoint_dir: String) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(&checkpoint_dir);
        let train_cfg    = ckpt_manager.load_config()?;

        let bundle    = PretrainedBundle::new(&train_cfg.model_dir);
        let tokenizer = TokenizerStore::new(&checkpoint_dir).load()?;

        let scorer = Scorer::from_checkpoint(
            &ckpt_manager,
            &bundle,
            tokenizer,
            train_cfg.max_seq_len,
        )?;

        Ok(Self {
            preprocessor: Preprocessor::new(),
            scorer,
        })
    }
}

impl SentimentScorer for ScoreUseCase {
    fn score(&self, text: &str) -> Result<Vec<AspectScore>> {
        let clean = self.preprocessor.clean(text);
        if clean.is_empty() {
            anyhow::bail!("Review text is empty after cleaning — nothing to score");
        }
        self.scorer.predict(&clean)
    }
}
