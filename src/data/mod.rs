// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// This layer handles everything from the raw labelled CSV
// all the way to GPU-ready tensor batches.
//
// The pipeline flows in this order:
//
//   reviews.csv
//       │
//       ▼
//   CsvReviewLoader   → reads rows, parses text + raw labels
//       │
//       ▼
//   Preprocessor      → cleans text (whitespace, encoding)
//       │
//       ▼
//   labels            → shifts -1/0/+1 to class indices 0/1/2
//       │
//       ▼
//   SequenceEncoder   → fixed-length token ids + segment ids
//       │
//       ▼
//   ReviewDataset     → implements Burn's Dataset trait
//       │
//       ▼
//   ReviewBatcher     → stacks samples into tensor batches
//       │
//       ▼
//   DataLoader        → feeds batches to the training loop
//
// Each module is responsible for exactly one step.
// This makes each step independently testable and replaceable.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Loads the labelled review corpus from CSV
pub mod loader;

/// Cleans and normalises raw review text
pub mod preprocessor;

/// Shifts raw ternary labels to class indices and one-hot vectors
pub mod labels;

/// Tokenises text into fixed-length id/segment/mask sequences
pub mod encoding;

/// Implements Burn's Dataset trait for encoded review samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;

/// Shuffles and splits data into train/validation sets
pub mod splitter;
