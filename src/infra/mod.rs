// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Handles all cross-cutting concerns that don't belong in
// any specific business layer:
//
//   checkpoint.rs      — Saving and loading model weights
//                        Uses Burn's CompactRecorder to
//                        serialise model parameters to disk.
//                        Also saves/loads TrainConfig as JSON
//                        so scoring can rebuild the model.
//
//   pretrained.rs      — The externally supplied encoder bundle:
//                        architecture config, trunk checkpoint
//                        and vocabulary file, resolved from one
//                        directory.
//
//   tokenizer_store.rs — Tokenizer persistence
//                        Builds a WordPiece tokenizer from the
//                        bundle's vocabulary on first use, or
//                        loads the previously persisted one.
//                        Ensures the same vocabulary is used for
//                        training and scoring.
//
//   metrics.rs         — Training metrics logging
//                        Writes epoch-level metrics (losses,
//                        per-aspect accuracy) to a CSV file and
//                        owns the improvement test that gates
//                        checkpointing.
//
// Why is this a separate layer?
//   These concerns are used by multiple other layers but
//   don't belong to any one of them. Keeping them here:
//   - Prevents duplication across layers
//   - Makes it easy to swap implementations
//   - Keeps other layers focused on their core logic
//
// Reference: Rust Book §7 (Modules)
//            Burn Book §5 (Checkpointing)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Pretrained encoder bundle (config + weights + vocabulary)
pub mod pretrained;

/// Tokenizer building, saving, and loading
pub mod tokenizer_store;

/// Training metrics CSV logger
pub mod metrics;
