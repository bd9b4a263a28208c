//! Markdown training reports
//!
//! One report per completed comparison run, written to a timestamped file so
//! successive runs never clobber each other (second granularity).

use crate::error::Result;
use crate::training::ClassificationMetrics;
use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

/// Snapshot of a finished comparison, ready to render
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub timestamp: DateTime<Local>,
    pub sample_count: usize,
    pub feature_count: usize,
    pub test_fraction: f64,
    /// Per-model metrics in evaluation order
    pub per_model: Vec<(String, ClassificationMetrics)>,
    pub best_model_name: String,
}

impl TrainingReport {
    /// Render the full Markdown document
    pub fn render(&self) -> String {
        let stamp = self.timestamp.format("%Y-%m-%d_%H-%M-%S");
        let mut out = String::new();

        let _ = writeln!(out, "# Training Report - {stamp}\n");

        out.push_str("## Dataset Info\n");
        let _ = writeln!(out, "- Total samples: {}", self.sample_count);
        let _ = writeln!(out, "- Test size: {}%", (self.test_fraction * 100.0) as u32);
        let _ = writeln!(out, "- Features: {}\n", self.feature_count);

        out.push_str("## Model Performance\n\n");
        for (name, m) in &self.per_model {
            let _ = writeln!(out, "### {}", name.to_uppercase());
            let _ = writeln!(out, "- Accuracy:  {:.3}", m.accuracy);
            let _ = writeln!(out, "- Precision: {:.3}", m.precision);
            let _ = writeln!(out, "- Recall:    {:.3}", m.recall);
            let _ = writeln!(out, "- F1-score:  {:.3}\n", m.f1);
        }

        out.push_str("## Best Model ⭐\n");
        let _ = writeln!(out, "**{}**", self.best_model_name.to_uppercase());

        out
    }

    /// Write the rendered report under `dir`, creating it if needed.
    /// Returns the path of the written file.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let stamp = self.timestamp.format("%Y-%m-%d_%H-%M-%S");
        let path = dir.join(format!("training_report_{stamp}.md"));
        fs::write(&path, self.render())?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_report() -> TrainingReport {
        let metrics = ClassificationMetrics {
            accuracy: 0.95,
            precision: 0.9333,
            recall: 0.95,
            f1: 0.9412,
        };
        TrainingReport {
            timestamp: Local.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap(),
            sample_count: 100,
            feature_count: 4,
            test_fraction: 0.2,
            per_model: vec![("knn".to_string(), metrics)],
            best_model_name: "knn".to_string(),
        }
    }

    #[test]
    fn test_render_sections() {
        let text = sample_report().render();
        assert!(text.starts_with("# Training Report - 2024-03-05_14-30-00"));
        assert!(text.contains("## Dataset Info"));
        assert!(text.contains("- Total samples: 100"));
        assert!(text.contains("- Test size: 20%"));
        assert!(text.contains("- Features: 4"));
        assert!(text.contains("### KNN"));
        assert!(text.contains("- Accuracy:  0.950"));
        assert!(text.contains("- Precision: 0.933"));
        assert!(text.contains("- F1-score:  0.941"));
        assert!(text.contains("## Best Model"));
        assert!(text.contains("**KNN**"));
    }

    #[test]
    fn test_write_creates_timestamped_file() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("reports");
        let path = sample_report().write_to(&nested).unwrap();

        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "training_report_2024-03-05_14-30-00.md"
        );
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("## Model Performance"));
    }
}
