// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans raw review text before tokenisation.
//
// Spreadsheet-exported review text often contains:
//   - Non-breaking spaces (U+00A0) from copy-pasted storefronts
//   - Zero-width spaces (U+200B) and BOMs from mobile keyboards
//   - Carriage returns and embedded newlines from multi-line cells
//   - Full-width spaces (U+3000) from CJK input methods
//   - Control characters from emoji stripping upstream
//
// A review is encoded as a single flat sequence, so every kind
// of whitespace collapses to one plain space. If we don't clean
// these, the tokenizer treats them as meaningful tokens.
//
// Cleaning steps (applied in order):
//   1. Replace whitespace variants and control chars with a space
//   2. Collapse consecutive spaces into one
//   3. Trim leading/trailing whitespace
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor;

impl Preprocessor {
    /// Create a new Preprocessor instance
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw review string for downstream tokenisation.
    /// Takes a &str and returns an owned String.
    pub fn clean(&self, text: &str) -> String {
        // ── Step 1: Normalise individual characters ───────────────────────────
        // Map problematic Unicode characters to a plain space.
        let normalised: String = text
            .chars()
            .map(|c| match c {
                // Full-width (CJK) space → regular space
                '\u{3000}' => ' ',
                // Non-breaking space → regular space
                '\u{00A0}' => ' ',
                // Zero-width space → regular space
                '\u{200B}' => ' ',
                // Byte order mark → space
                '\u{FEFF}' => ' ',
                // Reviews are single sequences, line breaks carry no meaning
                c if c.is_whitespace() => ' ',
                // Any other control character → space
                c if c.is_control() => ' ',
                c => c,
            })
            .collect();

        // ── Step 2: Collapse runs of spaces, Step 3: trim ─────────────────────
        let mut out        = String::with_capacity(normalised.len());
        let mut last_space = false;

        for c in normalised.chars() {
            if c == ' ' {
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        out.trim().to_string()
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("great   value"), "great value");
    }

    #[test]
    fn test_trims_edges() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("  fast shipping  "), "fast shipping");
    }

    #[test]
    fn test_flattens_newlines() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("good quality\r\nwould buy again"), "good quality would buy again");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("nice\x01case"), "nice case");
    }

    #[test]
    fn test_fullwidth_space_collapses() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("质量\u{3000}很好"), "质量 很好");
    }

    #[test]
    fn test_empty_string() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
    }
}
