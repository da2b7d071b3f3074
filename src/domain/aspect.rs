// ============================================================
// Layer 3 — Aspect and Polarity Domain Types
// ============================================================
// A review is judged along seven independent sentiment
// dimensions ("aspects"), each on a three-way scale:
//   negative (-1), neutral (0), positive (+1)
//
// The aspects come from the labelled corpus columns, in order:
//   value for money, product quality, promotion participation,
//   service & logistics, returning customer, repurchase intent,
//   overall verdict
//
// Each aspect gets its own classification head on the shared
// encoder trunk. The overall verdict carries double weight in
// the training loss so the summary judgement dominates ties.
//
// Reference: Rust Book §6 (Enums and Pattern Matching)

use serde::{Deserialize, Serialize};

/// Number of sentiment dimensions scored per review.
pub const COUNT: usize = 7;

/// Number of polarity classes per dimension (negative/neutral/positive).
pub const POLARITY_CLASSES: usize = 3;

/// One of the seven sentiment dimensions.
///
/// The discriminant order matches the label-column order in the
/// corpus and the head order in the model — index `i` everywhere
/// refers to the same aspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Aspect {
    /// Was the product worth its price?
    ValueForMoney,
    /// Build/material quality of the product itself
    ProductQuality,
    /// Did the buyer join a promotion or sale event?
    Promotion,
    /// Customer service, logistics and packaging experience
    ServiceLogistics,
    /// Does the reviewer identify as a returning customer?
    RepeatCustomer,
    /// Would the reviewer buy again?
    RepurchaseIntent,
    /// The overall verdict of the review
    Overall,
}

impl Aspect {
    /// All aspects in label-column order.
    pub const ALL: [Aspect; COUNT] = [
        Aspect::ValueForMoney,
        Aspect::ProductQuality,
        Aspect::Promotion,
        Aspect::ServiceLogistics,
        Aspect::RepeatCustomer,
        Aspect::RepurchaseIntent,
        Aspect::Overall,
    ];

    /// Machine-friendly identifier, used for metrics CSV columns.
    pub fn key(&self) -> &'static str {
        match self {
            Aspect::ValueForMoney    => "value_for_money",
            Aspect::ProductQuality   => "product_quality",
            Aspect::Promotion        => "promotion",
            Aspect::ServiceLogistics => "service_logistics",
            Aspect::RepeatCustomer   => "repeat_customer",
            Aspect::RepurchaseIntent => "repurchase_intent",
            Aspect::Overall          => "overall",
        }
    }

    /// Human-readable name, used in the score report.
    pub fn label(&self) -> &'static str {
        match self {
            Aspect::ValueForMoney    => "value for money",
            Aspect::ProductQuality   => "product quality",
            Aspect::Promotion        => "promotion participation",
            Aspect::ServiceLogistics => "service & logistics",
            Aspect::RepeatCustomer   => "returning customer",
            Aspect::RepurchaseIntent => "repurchase intent",
            Aspect::Overall          => "overall verdict",
        }
    }

    /// Per-head weight in the combined training loss.
    /// The overall verdict counts double; all other heads weigh 1.0.
    pub fn loss_weight(&self) -> f64 {
        match self {
            Aspect::Overall => 2.0,
            _               => 1.0,
        }
    }
}

/// The ternary sentiment value of one aspect.
///
/// Two encodings exist side by side:
///   - raw corpus labels: -1 / 0 / +1
///   - class indices for the softmax heads: 0 / 1 / 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl Polarity {
    /// Parse a raw corpus label (-1, 0, +1).
    /// Returns `None` for anything outside the ternary scale.
    pub fn from_raw(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Polarity::Negative),
            0  => Some(Polarity::Neutral),
            1  => Some(Polarity::Positive),
            _  => None,
        }
    }

    /// Class index used by the classification heads (0, 1, 2).
    pub fn class_index(&self) -> usize {
        match self {
            Polarity::Negative => 0,
            Polarity::Neutral  => 1,
            Polarity::Positive => 2,
        }
    }

    /// Inverse of [`class_index`](Self::class_index).
    pub fn from_class(class: usize) -> Option<Self> {
        match class {
            0 => Some(Polarity::Negative),
            1 => Some(Polarity::Neutral),
            2 => Some(Polarity::Positive),
            _ => None,
        }
    }

    /// Lower-case display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Negative => "negative",
            Polarity::Neutral  => "neutral",
            Polarity::Positive => "positive",
        }
    }
}

/// The scored outcome of one aspect for one review.
///
/// `probabilities` holds the full softmax distribution in class-index
/// order (negative, neutral, positive); `confidence` is the probability
/// of the winning class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AspectScore {
    pub aspect:        Aspect,
    pub polarity:      Polarity,
    pub confidence:    f32,
    pub probabilities: [f32; POLARITY_CLASSES],
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_order_is_stable() {
        // Column order in the corpus = head order in the model.
        assert_eq!(Aspect::ALL.len(), COUNT);
        assert_eq!(Aspect::ALL[0], Aspect::ValueForMoney);
        assert_eq!(Aspect::ALL[COUNT - 1], Aspect::Overall);
    }

    #[test]
    fn test_overall_weighs_double() {
        for aspect in Aspect::ALL {
            let expected = if aspect == Aspect::Overall { 2.0 } else { 1.0 };
            assert_eq!(aspect.loss_weight(), expected);
        }
    }

    #[test]
    fn test_polarity_raw_round_trip() {
        for raw in [-1i8, 0, 1] {
            let p = Polarity::from_raw(raw).unwrap();
            let back = Polarity::from_class(p.class_index()).unwrap();
            assert_eq!(p, back);
        }
    }

    #[test]
    fn test_polarity_rejects_out_of_range() {
        assert!(Polarity::from_raw(2).is_none());
        assert!(Polarity::from_raw(-2).is_none());
        assert!(Polarity::from_class(3).is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, a) in Aspect::ALL.iter().enumerate() {
            for b in &Aspect::ALL[i + 1..] {
                assert_ne!(a.key(), b.key());
            }
        }
    }
}
