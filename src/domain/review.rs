// ============================================================
// Layer 3 — Review Domain Type
// ============================================================
// Represents a single labelled review loaded from the corpus.
// This is a plain data struct with no behaviour —
// the free text plus one raw ternary label per aspect.
//
// The labels here are still in corpus encoding (-1/0/+1);
// shifting them to class indices is the label encoder's job
// (Layer 4), not the domain type's.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

use crate::domain::aspect;

/// A raw labelled review.
/// By the time a `Review` exists, the text has been extracted from
/// the tabular file but not yet cleaned or tokenised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    /// The free-text review body
    pub text: String,

    /// One raw ternary label per aspect, in [`Aspect::ALL`] order.
    /// Values are expected in {-1, 0, 1}; validation happens when
    /// the labels are encoded for training.
    ///
    /// [`Aspect::ALL`]: crate::domain::aspect::Aspect::ALL
    pub labels: [i8; aspect::COUNT],
}

impl Review {
    /// Create a new Review.
    /// Uses impl Into<String> so callers can pass &str or String.
    pub fn new(text: impl Into<String>, labels: [i8; aspect::COUNT]) -> Self {
        Self { text: text.into(), labels }
    }
}
