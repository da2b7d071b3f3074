// ============================================================
// Layer 4 — Sequence Encoder (Tokenizer Adapter)
// ============================================================
// Converts cleaned review text into the fixed-length integer
// sequences the encoder consumes.
//
// Output per review, each exactly max_seq_len long:
//   token_ids:      [CLS] t1 t2 ... [SEP] [PAD] [PAD] ...
//   segment_ids:    all zeros — a review is a single sentence,
//                   so every real token is in segment 0
//   attention_mask: 1 for real tokens, 0 for padding
//
// Truncation keeps the leading tokens and always terminates the
// real tokens with [SEP], matching the pretrained encoder's
// input convention.
//
// Special-token ids are looked up in the vocabulary rather than
// hard-coded: the vocabulary file is supplied externally and the
// ids follow whatever order that file uses.
//
// Reference: Devlin et al. (2019) BERT - input representation

use anyhow::{bail, Result};
use tokenizers::Tokenizer;

/// One review, tokenised and padded.
/// All three sequences have identical length (`max_seq_len`).
#[derive(Debug, Clone)]
pub struct EncodedSequence {
    pub token_ids:      Vec<u32>,
    pub segment_ids:    Vec<u32>,
    pub attention_mask: Vec<u32>,
}

/// Wraps the vocabulary tokenizer and owns the sequence policy
/// (special tokens, truncation, padding).
pub struct SequenceEncoder {
    tokenizer:   Tokenizer,
    max_seq_len: usize,
    cls_id:      u32,
    sep_id:      u32,
    pad_id:      u32,
}

impl SequenceEncoder {
    /// Build an encoder around a loaded tokenizer.
    ///
    /// Fails if the vocabulary is missing any of the [CLS], [SEP]
    /// or [PAD] special tokens, or if `max_seq_len` cannot hold
    /// even an empty review ([CLS] + [SEP]).
    pub fn new(tokenizer: Tokenizer, max_seq_len: usize) -> Result<Self> {
        if max_seq_len < 2 {
            bail!("max_seq_len is {max_seq_len}, need at least 2 for [CLS] and [SEP]");
        }

        let lookup = |token: &str| -> Result<u32> {
            tokenizer
                .token_to_id(token)
                .ok_or_else(|| anyhow::anyhow!("vocabulary has no '{token}' token"))
        };

        Ok(Self {
            cls_id: lookup("[CLS]")?,
            sep_id: lookup("[SEP]")?,
            pad_id: lookup("[PAD]")?,
            tokenizer,
            max_seq_len,
        })
    }

    /// The configured sequence length; every encoded sequence has
    /// exactly this many positions.
    pub fn max_seq_len(&self) -> usize {
        self.max_seq_len
    }

    /// Encode one review into fixed-length sequences.
    pub fn encode(&self, text: &str) -> Result<EncodedSequence> {
        let enc = self
            .tokenizer
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        // Build [CLS] text-tokens, leaving room for the closing [SEP]
        let mut token_ids: Vec<u32> = Vec::with_capacity(self.max_seq_len);
        token_ids.push(self.cls_id);
        token_ids.extend_from_slice(enc.get_ids());
        token_ids.truncate(self.max_seq_len - 1);
        token_ids.push(self.sep_id);

        // Attention mask: 1 for real tokens, 0 for padding
        let real_len = token_ids.len();
        let mut attention_mask = vec![1u32; real_len];

        // Pad both sequences out to the fixed length
        while token_ids.len() < self.max_seq_len {
            token_ids.push(self.pad_id);
            attention_mask.push(0);
        }

        // Single-sentence input: every position is segment 0
        let segment_ids = vec![0u32; self.max_seq_len];

        Ok(EncodedSequence { token_ids, segment_ids, attention_mask })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// A four-word vocabulary plus the BERT special tokens, in the
    /// same tokenizer JSON shape the TokenizerStore writes.
    fn tiny_tokenizer() -> Tokenizer {
        let json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": [
                {"id": 0, "content": "[PAD]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 1, "content": "[UNK]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 2, "content": "[CLS]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true},
                {"id": 3, "content": "[SEP]",  "single_word": false, "lstrip": false, "rstrip": false, "normalized": false, "special": true}
            ],
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": { "type": "Whitespace" },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": {
                    "[PAD]": 0, "[UNK]": 1, "[CLS]": 2, "[SEP]": 3,
                    "great": 4, "phone": 5, "cheap": 6, "case": 7
                },
                "unk_token": "[UNK]"
            }
        });
        Tokenizer::from_bytes(serde_json::to_vec(&json).unwrap()).unwrap()
    }

    #[test]
    fn test_sequences_have_fixed_length() {
        let enc = SequenceEncoder::new(tiny_tokenizer(), 10).unwrap();
        let seq = enc.encode("great phone").unwrap();
        assert_eq!(seq.token_ids.len(), 10);
        assert_eq!(seq.segment_ids.len(), 10);
        assert_eq!(seq.attention_mask.len(), 10);
    }

    #[test]
    fn test_cls_first_sep_terminates_real_tokens() {
        let enc = SequenceEncoder::new(tiny_tokenizer(), 10).unwrap();
        let seq = enc.encode("great phone").unwrap();
        assert_eq!(seq.token_ids[0], 2); // [CLS]
        // real tokens: [CLS] great phone [SEP]
        assert_eq!(seq.token_ids[3], 3); // [SEP]
        assert_eq!(seq.token_ids[4], 0); // [PAD]
    }

    #[test]
    fn test_mask_matches_padding() {
        let enc = SequenceEncoder::new(tiny_tokenizer(), 8).unwrap();
        let seq = enc.encode("cheap case").unwrap();
        for (id, mask) in seq.token_ids.iter().zip(seq.attention_mask.iter()) {
            if *mask == 0 {
                assert_eq!(*id, 0, "padding position must hold [PAD]");
            }
        }
        assert_eq!(seq.attention_mask[..4], [1, 1, 1, 1]);
        assert_eq!(seq.attention_mask[4..], [0, 0, 0, 0]);
    }

    #[test]
    fn test_long_text_truncates_but_keeps_sep() {
        let enc = SequenceEncoder::new(tiny_tokenizer(), 4).unwrap();
        let seq = enc.encode("great phone cheap case great phone").unwrap();
        assert_eq!(seq.token_ids.len(), 4);
        assert_eq!(seq.token_ids[0], 2); // [CLS]
        assert_eq!(seq.token_ids[3], 3); // [SEP] survives truncation
        assert!(seq.attention_mask.iter().all(|&m| m == 1));
    }

    #[test]
    fn test_segment_ids_are_all_zero() {
        let enc = SequenceEncoder::new(tiny_tokenizer(), 6).unwrap();
        let seq = enc.encode("great").unwrap();
        assert!(seq.segment_ids.iter().all(|&s| s == 0));
    }

    #[test]
    fn test_rejects_tiny_max_len() {
        assert!(SequenceEncoder::new(tiny_tokenizer(), 1).is_err());
    }
}
