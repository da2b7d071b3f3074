// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains ALL Burn framework specific code.
// No other layer imports from burn directly — only this one
// and the data layer's tensor batcher.
//
// Why isolate Burn code here?
//   - If Burn's API changes, we only update this layer
//   - Other layers are testable without a GPU
//   - The model architecture is clearly separated from
//     data loading and application logic
//
// What's in this layer:
//
//   model.rs   — The model architecture
//                • BERT-style text encoder (token, position and
//                  segment embeddings, multi-head self-attention
//                  blocks, GELU feed-forward, layer norm) whose
//                  weights load from the pretrained checkpoint
//                • First-token ([CLS]) pooling
//                • Seven independent dropout+linear heads, one
//                  per sentiment aspect
//                • Weighted multi-head cross-entropy objective
//
//   trainer.rs — The fine-tuning loop
//                Forward pass, loss computation, backward pass,
//                optimiser step, validation metrics, and
//                checkpointing on validation-loss improvement
//
//   scorer.rs  — The inference engine
//                Loads a checkpoint, tokenises input, runs the
//                model, softmaxes each head into a polarity
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Vaswani et al. (2017) Attention Is All You Need
//            Devlin et al. (2019) BERT

/// Encoder trunk + seven-head sentiment model architecture
pub mod model;

/// Full fine-tuning loop with validation and checkpointing
pub mod trainer;

/// Inference engine — loads checkpoint and scores reviews
pub mod scorer;
