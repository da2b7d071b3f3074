// ============================================================
// Layer 4 — Review Corpus Loader
// ============================================================
// Loads the labelled review corpus from a CSV file using the
// csv crate.
//
// Expected layout (the CSV export of the labelled spreadsheet):
//   - a header row,
//   - column 0: the free-text review,
//   - columns 1..=7: one ternary label per aspect, in
//     Aspect::ALL order, each written as -1, 0 or 1.
//
// Columns are positional, not name-matched — the original
// spreadsheet identifies aspects purely by column order, so the
// loader does the same and only checks the column count.
//
// Rows that cannot be parsed are hard errors carrying the row
// number: silently dropping a labelled example would skew the
// class balance without anyone noticing.
//
// Reference: csv crate documentation
//            Rust Book §9 (Error Handling)

use anyhow::{bail, Context, Result};
use csv::ReaderBuilder;
use std::fs::File;
use std::path::Path;

use crate::domain::aspect;
use crate::domain::review::Review;
use crate::domain::traits::ReviewSource;

/// Loads labelled reviews from a single CSV file.
/// Implements the ReviewSource trait from Layer 3.
pub struct CsvReviewLoader {
    /// Path to the CSV file
    path: String,
}

impl CsvReviewLoader {
    /// Create a new loader pointed at a CSV file
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl ReviewSource for CsvReviewLoader {
    fn load_all(&self) -> Result<Vec<Review>> {
        let path = Path::new(&self.path);
        let file = File::open(path)
            .with_context(|| format!("Cannot open review corpus '{}'", self.path))?;

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut reviews = Vec::new();

        for (idx, record) in reader.records().enumerate() {
            // Row 1 is the header, so the first data record is row 2
            let row = idx + 2;
            let record = record
                .with_context(|| format!("Cannot read row {row} of '{}'", self.path))?;

            if record.len() < 1 + aspect::COUNT {
                bail!(
                    "Row {row} of '{}' has {} columns, expected at least {} \
                     (text + {} aspect labels)",
                    self.path,
                    record.len(),
                    1 + aspect::COUNT,
                    aspect::COUNT,
                );
            }

            let text = record[0].to_string();

            let mut labels = [0i8; aspect::COUNT];
            for (i, slot) in labels.iter_mut().enumerate() {
                let field = record[i + 1].trim();
                *slot = field.parse::<i8>().with_context(|| {
                    format!(
                        "Row {row}, label column {}: '{}' is not an integer label",
                        i + 1,
                        field,
                    )
                })?;
            }

            reviews.push(Review::new(text, labels));
        }

        tracing::info!("Loaded {} reviews from '{}'", reviews.len(), self.path);
        Ok(reviews)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// Write a throwaway CSV into the OS temp directory and return its path.
    fn write_temp_csv(name: &str, contents: &str) -> String {
        let path = std::env::temp_dir().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_loads_rows_in_order() {
        let path = write_temp_csv(
            "review_loader_ok.csv",
            "text,a,b,c,d,e,f,g\n\
             great phone,1,1,0,0,-1,1,1\n\
             arrived broken,-1,-1,0,-1,0,-1,-1\n",
        );
        let reviews = CsvReviewLoader::new(&path).load_all().unwrap();
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].text, "great phone");
        assert_eq!(reviews[0].labels, [1, 1, 0, 0, -1, 1, 1]);
        assert_eq!(reviews[1].labels[0], -1);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = CsvReviewLoader::new("no/such/file.csv").load_all();
        assert!(result.is_err());
    }

    #[test]
    fn test_short_row_reports_row_number() {
        let path = write_temp_csv(
            "review_loader_short.csv",
            "text,a,b,c,d,e,f,g\nonly,1,0\n",
        );
        let err = CsvReviewLoader::new(&path).load_all().unwrap_err();
        // csv itself rejects the ragged row; the row number must survive
        // in the error chain either way.
        assert!(format!("{err:#}").contains('2'), "error was: {err:#}");
    }

    #[test]
    fn test_non_integer_label_is_an_error() {
        let path = write_temp_csv(
            "review_loader_bad_label.csv",
            "text,a,b,c,d,e,f,g\nok product,1,0,0,yes,0,1,1\n",
        );
        let err = CsvReviewLoader::new(&path).load_all().unwrap_err();
        assert!(format!("{err:#}").contains("yes"), "error was: {err:#}");
    }

    #[test]
    fn test_header_only_gives_empty_corpus() {
        let path = write_temp_csv("review_loader_empty.csv", "text,a,b,c,d,e,f,g\n");
        let reviews = CsvReviewLoader::new(&path).load_all().unwrap();
        assert!(reviews.is_empty());
    }
}
