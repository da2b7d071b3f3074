// ============================================================
// Layer 4 — Label Encoder
// ============================================================
// Shifts the corpus label encoding into model space.
//
// The corpus scores every aspect as -1 (negative), 0 (neutral)
// or +1 (positive). Classification heads index classes from 0,
// so the raw value is shifted by one:
//
//   -1 → 0    (negative)
//    0 → 1    (neutral)
//   +1 → 2    (positive)
//
// The shifted index can be expanded to a one-hot probability
// vector ([0,1,0] for neutral, etc.) where a distribution target
// is needed; the training loss consumes the index directly.
//
// The raw value MUST be in {-1, 0, 1} before shifting — anything
// else is corrupt data and the whole run stops with the row that
// caused it, rather than training on a garbage class.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::{bail, Result};

use crate::domain::aspect::{self, Aspect, Polarity, POLARITY_CLASSES};

/// Shift one raw ternary label into its class index.
pub fn encode_polarity(raw: i8) -> Result<u8> {
    match Polarity::from_raw(raw) {
        Some(p) => Ok(p.class_index() as u8),
        None => bail!("label value {raw} is outside the ternary scale {{-1, 0, 1}}"),
    }
}

/// Shift all seven labels of one review into class indices.
/// `row` is the 1-based corpus row, threaded through for error reporting.
pub fn encode_labels(raw: &[i8; aspect::COUNT], row: usize) -> Result<[u8; aspect::COUNT]> {
    let mut encoded = [0u8; aspect::COUNT];
    for (i, (&value, slot)) in raw.iter().zip(encoded.iter_mut()).enumerate() {
        match encode_polarity(value) {
            Ok(class) => *slot = class,
            Err(_) => bail!(
                "Row {row}: aspect '{}' has label {value}, expected -1, 0 or 1",
                Aspect::ALL[i].key(),
            ),
        }
    }
    Ok(encoded)
}

/// Expand a class index into a one-hot vector over the three
/// polarity classes.
pub fn one_hot(class: u8) -> [f32; POLARITY_CLASSES] {
    let mut v = [0.0; POLARITY_CLASSES];
    if let Some(slot) = v.get_mut(class as usize) {
        *slot = 1.0;
    }
    v
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_matches_polarity_scale() {
        assert_eq!(encode_polarity(-1).unwrap(), 0);
        assert_eq!(encode_polarity(0).unwrap(), 1);
        assert_eq!(encode_polarity(1).unwrap(), 2);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert!(encode_polarity(2).is_err());
        assert!(encode_polarity(-3).is_err());
    }

    #[test]
    fn test_encode_labels_whole_record() {
        let raw = [-1, 0, 1, 1, 0, -1, 1];
        let encoded = encode_labels(&raw, 5).unwrap();
        assert_eq!(encoded, [0, 1, 2, 2, 1, 0, 2]);
    }

    #[test]
    fn test_encode_labels_names_row_and_aspect() {
        let raw = [-1, 0, 7, 1, 0, -1, 1];
        let err = encode_labels(&raw, 42).unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Row 42"), "message was: {msg}");
        assert!(msg.contains("promotion"), "message was: {msg}");
    }

    #[test]
    fn test_one_hot_shape() {
        assert_eq!(one_hot(0), [1.0, 0.0, 0.0]);
        assert_eq!(one_hot(1), [0.0, 1.0, 0.0]);
        assert_eq!(one_hot(2), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_one_hot_sums_to_one() {
        for class in 0..3u8 {
            let v = one_hot(class);
            assert!((v.iter().sum::<f32>() - 1.0).abs() < f32::EPSILON);
        }
    }
}
