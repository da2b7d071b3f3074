// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds the runtime tokenizer from the pretrained bundle's
// vocabulary file and persists it next to the checkpoints.
//
// The bundle ships a bare vocab.txt (one token per line, id =
// line number, BERT convention). The tokenizers crate wants a
// full tokenizer JSON, so we write one directly: WordPiece over
// the vocabulary, BERT normalisation with Chinese-character
// handling, whitespace-and-punctuation pre-tokenisation. The
// JSON lands in the checkpoint directory so training and scoring
// are guaranteed to use the same vocabulary.
//
// Reference: Wu et al. (2016) WordPiece
//            Devlin et al. (2019) BERT

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;

pub struct TokenizerStore {
    dir: PathBuf,
}

impl TokenizerStore {
    pub fn new(dir: impl Into<String>) -> Self {
        Self { dir: PathBuf::from(dir.into()) }
    }

    /// Load the persisted tokenizer, or build it from the bundle's
    /// vocabulary file on first use.
    pub fn load_or_build(&self, vocab_file: &Path) -> Result<Tokenizer> {
        let tok_path = self.dir.join("tokenizer.json");
        if tok_path.exists() {
            tracing::info!("Loading existing tokenizer from disk");
            self.load()
        } else {
            tracing::info!("Building tokenizer from '{}'", vocab_file.display());
            self.build_and_save(vocab_file)
        }
    }

    /// Load a previously saved tokenizer from its JSON file
    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.dir.join("tokenizer.json");
        Tokenizer::from_file(&path)
            .map_err(|e| anyhow::anyhow!(
                "Cannot load tokenizer from '{}': {}", path.display(), e
            ))
    }

    /// Read vocab.txt and write a complete WordPiece tokenizer JSON.
    fn build_and_save(&self, vocab_file: &Path) -> Result<Tokenizer> {
        std::fs::create_dir_all(&self.dir).ok();

        // ── Step 1: Read the vocabulary ───────────────────────────────────────
        // One token per line; the id of a token is its line number.
        let raw = std::fs::read_to_string(vocab_file).with_context(|| {
            format!(
                "Cannot read vocabulary '{}'. The pretrained bundle must supply it.",
                vocab_file.display()
            )
        })?;

        let mut vocab = serde_json::Map::new();
        for (id, line) in raw.lines().enumerate() {
            let token = line.trim_end_matches(['\r', '\n']);
            if token.is_empty() {
                continue;
            }
            // First occurrence wins, matching BERT vocab semantics
            vocab
                .entry(token.to_string())
                .or_insert_with(|| serde_json::json!(id));
        }

        if vocab.is_empty() {
            bail!("Vocabulary '{}' is empty", vocab_file.display());
        }

        // ── Step 2: Locate the special tokens ─────────────────────────────────
        // Their ids come from the vocabulary itself, not from constants:
        // the bundle decides the numbering.
        let special_id = |token: &str| -> Result<u64> {
            vocab
                .get(token)
                .and_then(|v| v.as_u64())
                .ok_or_else(|| anyhow::anyhow!(
                    "Vocabulary '{}' has no '{token}' token", vocab_file.display()
                ))
        };

        let added_tokens: Vec<serde_json::Value> = ["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]"]
            .iter()
            .map(|&token| -> Result<serde_json::Value> {
                Ok(serde_json::json!({
                    "id": special_id(token)?,
                    "content": token,
                    "single_word": false,
                    "lstrip": false,
                    "rstrip": false,
                    "normalized": false,
                    "special": true,
                }))
            })
            .collect::<Result<_>>()?;

        // ── Step 3: Write tokenizer JSON in HuggingFace format ────────────────
        // This format is what Tokenizer::from_file() expects
        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "BertPreTokenizer"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordPiece",
                "unk_token": "[UNK]",
                "continuing_subword_prefix": "##",
                "max_input_chars_per_word": 100,
                "vocab": vocab
            }
        });

        let tok_path = self.dir.join("tokenizer.json");
        std::fs::write(
            &tok_path,
            serde_json::to_string_pretty(&tokenizer_json)?
        ).with_context(|| "Cannot write tokenizer JSON")?;

        tracing::info!(
            "Tokenizer built ({} tokens), saved to '{}'",
            tokenizer_json["model"]["vocab"].as_object().map(|m| m.len()).unwrap_or(0),
            tok_path.display()
        );

        // Load back as a proper Tokenizer instance
        Tokenizer::from_file(&tok_path)
            .map_err(|e| anyhow::anyhow!("Cannot reload tokenizer: {e}"))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_vocab(dir: &Path, tokens: &[&str]) -> PathBuf {
        std::fs::create_dir_all(dir).unwrap();
        let path = dir.join("vocab.txt");
        let mut f = std::fs::File::create(&path).unwrap();
        for t in tokens {
            writeln!(f, "{t}").unwrap();
        }
        path
    }

    #[test]
    fn test_builds_wordpiece_from_vocab_file() {
        let dir = std::env::temp_dir().join("tokenizer_store_build");
        let _ = std::fs::remove_dir_all(&dir);
        let vocab = write_vocab(
            &dir,
            &["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "good", "bad", "##ness"],
        );

        let store = TokenizerStore::new(dir.to_str().unwrap());
        let tokenizer = store.load_or_build(&vocab).unwrap();

        // Ids follow line numbers
        assert_eq!(tokenizer.token_to_id("[PAD]"), Some(0));
        assert_eq!(tokenizer.token_to_id("[CLS]"), Some(2));
        assert_eq!(tokenizer.token_to_id("good"), Some(5));

        // Known word tokenises to itself, unknown word to [UNK]
        let enc = tokenizer.encode("good", false).unwrap();
        assert_eq!(enc.get_ids(), &[5]);
        let enc = tokenizer.encode("mediocre", false).unwrap();
        assert_eq!(enc.get_ids(), &[1]);
    }

    #[test]
    fn test_second_call_loads_persisted_tokenizer() {
        let dir = std::env::temp_dir().join("tokenizer_store_reload");
        let _ = std::fs::remove_dir_all(&dir);
        let vocab = write_vocab(&dir, &["[PAD]", "[UNK]", "[CLS]", "[SEP]", "[MASK]", "fine"]);

        let store = TokenizerStore::new(dir.to_str().unwrap());
        store.load_or_build(&vocab).unwrap();

        // Remove the source vocabulary — the persisted JSON must suffice
        std::fs::remove_file(&vocab).unwrap();
        let tokenizer = store.load_or_build(&vocab).unwrap();
        assert_eq!(tokenizer.token_to_id("fine"), Some(5));
    }

    #[test]
    fn test_vocab_without_specials_is_rejected() {
        let dir = std::env::temp_dir().join("tokenizer_store_nospecials");
        let _ = std::fs::remove_dir_all(&dir);
        let vocab = write_vocab(&dir, &["just", "plain", "words"]);

        let store = TokenizerStore::new(dir.to_str().unwrap());
        let err = store.load_or_build(&vocab).unwrap_err();
        assert!(format!("{err}").contains("[PAD]"), "error was: {err}");
    }
}
