// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Records training metrics to a CSV file after each epoch.
//
// Why log metrics to CSV?
//   - Easy to open in a spreadsheet
//   - Can plot learning curves to diagnose training issues
//   - Provides a permanent record of each training run
//
// Metrics recorded per epoch:
//   - epoch:      the epoch number (1, 2, 3, ...)
//   - train_loss: average weighted multi-head loss on training set
//   - val_loss:   the same objective on the validation set —
//                 this is the value that gates checkpointing
//   - acc_<aspect>: validation accuracy of each of the seven
//                 heads, in Aspect::ALL order
//
// Output file: checkpoints/metrics.csv
//
// Example CSV output:
//   epoch,train_loss,val_loss,acc_value_for_money,...,acc_overall
//   1,6.824500,6.589200,0.423000,...,0.518000
//   2,5.190100,5.254300,0.484000,...,0.572000
//
// How to read the metrics:
//   - Loss should decrease each epoch (model is learning)
//   - If val_loss increases while train_loss decreases → overfitting
//   - The overall head converges first — it carries double loss weight
//
// Reference: Rust Book §12 (I/O and File Handling)

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::domain::aspect::Aspect;

/// One row of metrics data for a single training epoch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// The epoch number (starts at 1)
    pub epoch: usize,

    /// Average weighted multi-head loss over all training batches
    pub train_loss: f64,

    /// Average weighted multi-head loss on the validation set.
    /// Should track train_loss — divergence indicates overfitting.
    pub val_loss: f64,

    /// Validation accuracy per aspect head, in Aspect::ALL order.
    /// Range: [0.0, 1.0] per entry.
    pub aspect_acc: Vec<f64>,
}

impl EpochMetrics {
    /// Create a new EpochMetrics record
    pub fn new(
        epoch:      usize,
        train_loss: f64,
        val_loss:   f64,
        aspect_acc: Vec<f64>,
    ) -> Self {
        Self { epoch, train_loss, val_loss, aspect_acc }
    }

    /// Returns true if this epoch improved over the previous best
    /// validation loss — the condition for writing a checkpoint.
    pub fn is_improvement(&self, best_val_loss: f64) -> bool {
        self.val_loss < best_val_loss
    }

    /// Mean accuracy across all aspect heads
    pub fn mean_accuracy(&self) -> f64 {
        if self.aspect_acc.is_empty() {
            return 0.0;
        }
        self.aspect_acc.iter().sum::<f64>() / self.aspect_acc.len() as f64
    }
}

/// Logs epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    /// Full path to the CSV file
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger.
    /// Writes the CSV header if the file doesn't exist yet.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");

        // Write the header only if the file is new —
        // this allows appending to an existing log across runs
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "{}", Self::header())?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// The CSV header row: fixed columns plus one accuracy column
    /// per aspect, named after the aspect key.
    fn header() -> String {
        let mut cols = vec!["epoch".to_string(), "train_loss".to_string(), "val_loss".to_string()];
        cols.extend(Aspect::ALL.iter().map(|a| format!("acc_{}", a.key())));
        cols.join(",")
    }

    /// Append one epoch's metrics as a new row in the CSV.
    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        // Open in append mode — adds to end of file
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)?;

        let mut row = format!("{},{:.6},{:.6}", m.epoch, m.train_loss, m.val_loss);
        for acc in &m.aspect_acc {
            row.push_str(&format!(",{acc:.6}"));
        }
        writeln!(f, "{row}")?;

        tracing::debug!(
            "Logged epoch {} metrics: train_loss={:.4}, val_loss={:.4}, mean_acc={:.4}",
            m.epoch,
            m.train_loss,
            m.val_loss,
            m.mean_accuracy(),
        );

        Ok(())
    }

    /// Return the path to the metrics CSV file
    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::aspect;

    #[test]
    fn test_is_improvement() {
        let m = EpochMetrics::new(2, 2.5, 2.3, vec![0.5; aspect::COUNT]);
        // 2.3 < 3.0 → this is an improvement
        assert!(m.is_improvement(3.0));
        // 2.3 is NOT less than 2.0 → not an improvement
        assert!(!m.is_improvement(2.0));
        // Equal is not an improvement either
        assert!(!m.is_improvement(2.3));
    }

    #[test]
    fn test_mean_accuracy() {
        let m = EpochMetrics::new(1, 1.0, 1.0, vec![0.2, 0.4, 0.6, 0.8, 1.0, 0.0, 0.5]);
        assert!((m.mean_accuracy() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_header_has_one_column_per_aspect() {
        let header = MetricsLogger::header();
        let cols: Vec<&str> = header.split(',').collect();
        assert_eq!(cols.len(), 3 + aspect::COUNT);
        assert_eq!(cols[0], "epoch");
        assert_eq!(cols[3], "acc_value_for_money");
        assert_eq!(cols[cols.len() - 1], "acc_overall");
    }

    #[test]
    fn test_logged_rows_match_header_width() {
        let dir = std::env::temp_dir().join("metrics_logger_test");
        let _ = std::fs::remove_dir_all(&dir);

        let logger = MetricsLogger::new(dir.to_str().unwrap().to_string()).unwrap();
        let m = EpochMetrics::new(1, 3.2, 3.1, vec![0.4; aspect::COUNT]);
        logger.log(&m).unwrap();

        let contents = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0].split(',').count(),
            lines[1].split(',').count(),
        );
    }
}
