//! Distribution summary of the binary decline targets.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tampere_data::schema::col as cols;

/// The four target columns, in reporting order.
const LABEL_COLUMNS: [&str; 4] = [cols::Y_ROE, cols::Y_ROA, cols::Y_FCF, cols::Y_CFO];

/// 0/1 counts for one target column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// Target column name.
    pub label: String,
    /// Observations flagged as declines (value 1).
    pub declines: u64,
    /// Observations not flagged (value 0).
    pub steady: u64,
}

impl LabelCount {
    /// Total observations behind this label.
    pub const fn total(&self) -> u64 {
        self.declines + self.steady
    }

    /// Share of declines, as a percentage of total observations.
    pub fn decline_pct(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            self.declines as f64 / self.total() as f64 * 100.0
        }
    }
}

/// Distribution of all four targets over the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSummary {
    /// Number of panel rows summarized.
    pub rows: usize,
    /// Per-target counts.
    pub labels: Vec<LabelCount>,
}

/// Count the 0/1 distribution of each target column in the panel.
pub fn label_distribution(df: &DataFrame) -> PolarsResult<LabelSummary> {
    let mut labels = Vec::with_capacity(LABEL_COLUMNS.len());
    for name in LABEL_COLUMNS {
        let values = df.column(name)?.i32()?;
        let mut declines = 0u64;
        let mut steady = 0u64;
        for value in values.into_iter().flatten() {
            if value == 1 {
                declines += 1;
            } else {
                steady += 1;
            }
        }
        labels.push(LabelCount {
            label: name.to_string(),
            declines,
            steady,
        });
    }
    Ok(LabelSummary {
        rows: df.height(),
        labels,
    })
}

impl fmt::Display for LabelSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<8} {:>8} {:>8} {:>9}", "label", "decline", "steady", "decline%")?;
        for count in &self.labels {
            writeln!(
                f,
                "{:<8} {:>8} {:>8} {:>8.1}%",
                count.label,
                count.declines,
                count.steady,
                count.decline_pct()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled_panel() -> DataFrame {
        DataFrame::new(vec![
            Series::new(cols::Y_ROE.into(), vec![1i32, 0, 1, 1]).into(),
            Series::new(cols::Y_ROA.into(), vec![0i32, 0, 0, 0]).into(),
            Series::new(cols::Y_FCF.into(), vec![1i32, 1, 1, 1]).into(),
            Series::new(cols::Y_CFO.into(), vec![0i32, 1, 0, 1]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn counts_per_label() {
        let summary = label_distribution(&labeled_panel()).unwrap();

        assert_eq!(summary.rows, 4);
        assert_eq!(summary.labels.len(), 4);
        assert_eq!(summary.labels[0].declines, 3);
        assert_eq!(summary.labels[0].steady, 1);
        assert_eq!(summary.labels[1].declines, 0);
        assert_eq!(summary.labels[2].declines, 4);
    }

    #[test]
    fn percentages_follow_counts() {
        let summary = label_distribution(&labeled_panel()).unwrap();
        assert!((summary.labels[0].decline_pct() - 75.0).abs() < 1e-12);
        assert!((summary.labels[1].decline_pct() - 0.0).abs() < 1e-12);
    }

    #[test]
    fn display_renders_one_line_per_label() {
        let summary = label_distribution(&labeled_panel()).unwrap();
        let rendered = summary.to_string();
        assert!(rendered.contains("y_roe"));
        assert!(rendered.contains("75.0%"));
        assert_eq!(rendered.lines().count(), 5);
    }

    #[test]
    fn missing_label_column_is_an_error() {
        let df = DataFrame::new(vec![
            Series::new(cols::Y_ROE.into(), vec![1i32]).into(),
        ])
        .unwrap();
        assert!(label_distribution(&df).is_err());
    }
}
