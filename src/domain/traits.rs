// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them. For example:
//   - CsvReviewLoader implements ReviewSource
//   - A future JsonlLoader could also implement ReviewSource
//   - The application layer only sees ReviewSource
//     and works with both without any changes
//
// This is the Dependency Inversion Principle from SOLID,
// applied using Rust's trait system.
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;

use crate::domain::aspect::AspectScore;
use crate::domain::review::Review;

// ─── ReviewSource ─────────────────────────────────────────────────────────────
/// Any component that can load labelled reviews from a source.
///
/// Implementations:
///   - CsvReviewLoader → loads the CSV export of the labelled spreadsheet
pub trait ReviewSource {
    /// Load all available reviews from this source.
    fn load_all(&self) -> Result<Vec<Review>>;
}

// ─── SentimentScorer ──────────────────────────────────────────────────────────
/// Any component that can score review text along all seven aspects.
///
/// Implementations:
///   - ScoreUseCase → uses the fine-tuned transformer model
pub trait SentimentScorer {
    /// Score one piece of review text.
    /// Returns one [`AspectScore`] per aspect, in `Aspect::ALL` order.
    fn score(&self, text: &str) -> Result<Vec<AspectScore>>;
}
