//! Data loading for the two recognized source kinds
//!
//! (a) a bincode [`DatasetContainer`] holding the feature matrix and label
//!     vector directly, and
//! (b) a delimited tabular file with a header row, where the feature column
//!     holds per-row textual numeric-array literals.
//!
//! The literal parser is deliberately strict: it accepts bracketed,
//! comma-separated numbers and nothing else. Row content is untrusted, so
//! anything resembling an expression fails the whole load.

use crate::error::{ClfBenchError, Result};
use ndarray::Array2;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Serialized feature/label container (round-trip exact)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetContainer {
    pub features: Array2<f64>,
    pub labels: Vec<String>,
}

impl DatasetContainer {
    pub fn new(features: Array2<f64>, labels: Vec<String>) -> Result<Self> {
        if features.nrows() != labels.len() {
            return Err(ClfBenchError::ShapeError {
                expected: format!("{} labels", features.nrows()),
                actual: format!("{} labels", labels.len()),
            });
        }
        Ok(Self { features, labels })
    }

    /// Persist to a bincode file, creating parent directories if needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = bincode::serialize(self)?;
        fs::write(path, bytes)?;
        Ok(())
    }

    /// Load from a bincode file
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let container: Self = bincode::deserialize(&bytes)?;
        Ok(container)
    }
}

/// Data loader resolving a source location into a feature matrix and labels
pub struct DataLoader;

impl DataLoader {
    /// Load a dataset from `path`.
    ///
    /// `feature_column` is required for delimited sources and ignored for
    /// containers; `label_column` names the categorical target.
    pub fn load(
        path: &Path,
        feature_column: Option<&str>,
        label_column: &str,
    ) -> Result<(Array2<f64>, Vec<String>)> {
        if !path.exists() {
            return Err(ClfBenchError::NotFound(path.display().to_string()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match ext.as_str() {
            "bin" => {
                let container = DatasetContainer::load(path)?;
                info!(
                    rows = container.features.nrows(),
                    features = container.features.ncols(),
                    "loaded dataset container"
                );
                Ok((container.features, container.labels))
            }
            "csv" | "tsv" => {
                let delimiter = if ext == "tsv" { b'\t' } else { b',' };
                Self::load_delimited(path, delimiter, feature_column, label_column)
            }
            other => Err(ClfBenchError::FormatError(format!(
                "unrecognized source kind '{other}' for {} (expected .bin, .csv or .tsv)",
                path.display()
            ))),
        }
    }

    fn load_delimited(
        path: &Path,
        delimiter: u8,
        feature_column: Option<&str>,
        label_column: &str,
    ) -> Result<(Array2<f64>, Vec<String>)> {
        let feature_column = feature_column.ok_or_else(|| {
            ClfBenchError::FormatError(
                "delimited sources require a feature column holding numeric-array literals"
                    .to_string(),
            )
        })?;

        let parse_opts = CsvParseOptions::default().with_separator(delimiter);
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .with_parse_options(parse_opts)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;

        let available: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();

        for required in [label_column, feature_column] {
            if !available.iter().any(|c| c == required) {
                return Err(ClfBenchError::SchemaError {
                    column: required.to_string(),
                    available,
                });
            }
        }

        let labels = Self::string_column(&df, label_column)?;
        let features = Self::feature_column(&df, feature_column)?;

        if features.nrows() != labels.len() {
            return Err(ClfBenchError::ShapeError {
                expected: format!("{} labels", features.nrows()),
                actual: format!("{} labels", labels.len()),
            });
        }

        info!(
            rows = features.nrows(),
            features = features.ncols(),
            source = %path.display(),
            "loaded delimited dataset"
        );
        Ok((features, labels))
    }

    fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>> {
        let column = df.column(name)?.cast(&DataType::String)?;
        column
            .str()?
            .into_iter()
            .enumerate()
            .map(|(row, v)| {
                v.map(|s| s.to_string()).ok_or_else(|| {
                    ClfBenchError::DataError(format!("null value in column '{name}' at row {row}"))
                })
            })
            .collect()
    }

    /// Parse the feature column of array literals into a rectangular matrix.
    /// Any malformed row is fatal for the whole load.
    fn feature_column(df: &DataFrame, name: &str) -> Result<Array2<f64>> {
        let raw = Self::string_column(df, name)?;
        if raw.is_empty() {
            return Err(ClfBenchError::DataError("source has no data rows".to_string()));
        }

        let mut width: Option<usize> = None;
        let mut flat: Vec<f64> = Vec::with_capacity(raw.len() * 8);

        for (row, text) in raw.iter().enumerate() {
            let values = parse_array_literal(text).map_err(|e| {
                ClfBenchError::DataError(format!("row {row}: {e}"))
            })?;
            match width {
                None => width = Some(values.len()),
                Some(w) if w != values.len() => {
                    return Err(ClfBenchError::ShapeError {
                        expected: format!("{w} features per row"),
                        actual: format!("{} at row {row}", values.len()),
                    });
                }
                _ => {}
            }
            flat.extend_from_slice(&values);
        }

        let width = width.unwrap_or(0);
        if width == 0 {
            return Err(ClfBenchError::DataError(
                "feature column contains empty arrays".to_string(),
            ));
        }

        debug!(rows = raw.len(), width, "parsed feature column");
        Array2::from_shape_vec((raw.len(), width), flat).map_err(|e| ClfBenchError::ShapeError {
            expected: format!("({}, {width})", raw.len()),
            actual: e.to_string(),
        })
    }
}

/// Strict numeric-array literal parser.
///
/// Accepts `[x, y, z]` where each element parses as an f64. Fails closed on
/// everything else; this path must never evaluate expressions.
pub fn parse_array_literal(text: &str) -> Result<Vec<f64>> {
    let trimmed = text.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| {
            ClfBenchError::DataError(format!(
                "expected a bracketed numeric array literal, got '{trimmed}'"
            ))
        })?;

    let inner = inner.trim();
    if inner.is_empty() {
        return Ok(Vec::new());
    }

    inner
        .split(',')
        .map(|token| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| {
                ClfBenchError::DataError(format!("'{token}' is not a numeric literal"))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(lines: &[&str]) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_parse_array_literal() {
        let v = parse_array_literal("[0.1, 0.2, 0.3]").unwrap();
        assert_eq!(v, vec![0.1, 0.2, 0.3]);

        let v = parse_array_literal("  [1,-2.5,3e-1]  ").unwrap();
        assert_eq!(v, vec![1.0, -2.5, 0.3]);

        assert_eq!(parse_array_literal("[]").unwrap(), Vec::<f64>::new());
    }

    #[test]
    fn test_parse_array_literal_rejects_expressions() {
        assert!(parse_array_literal("[0.1, exec('rm')]").is_err());
        assert!(parse_array_literal("__import__('os')").is_err());
        assert!(parse_array_literal("[1 + 2]").is_err());
        assert!(parse_array_literal("0.1, 0.2").is_err());
    }

    #[test]
    fn test_container_roundtrip_exact() {
        let features = array![[0.1, 0.2], [0.3, 0.4], [1.0 / 3.0, f64::MIN_POSITIVE]];
        let labels = vec!["a".to_string(), "b".to_string(), "a".to_string()];
        let container = DatasetContainer::new(features.clone(), labels.clone()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        container.save(&path).unwrap();

        let reloaded = DatasetContainer::load(&path).unwrap();
        assert_eq!(reloaded.features, features);
        assert_eq!(reloaded.labels, labels);
    }

    #[test]
    fn test_load_container_via_loader() {
        let features = array![[1.0, 2.0], [3.0, 4.0]];
        let labels = vec!["x".to_string(), "y".to_string()];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.bin");
        DatasetContainer::new(features.clone(), labels.clone())
            .unwrap()
            .save(&path)
            .unwrap();

        let (x, y) = DataLoader::load(&path, None, "label").unwrap();
        assert_eq!(x, features);
        assert_eq!(y, labels);
    }

    #[test]
    fn test_load_csv() {
        let file = write_csv(&[
            "embedding,category",
            "\"[0.1, 0.2]\",spam",
            "\"[0.3, 0.4]\",ham",
        ]);
        let (x, y) = DataLoader::load(file.path(), Some("embedding"), "category").unwrap();
        assert_eq!(x.nrows(), 2);
        assert_eq!(x.ncols(), 2);
        assert_eq!(y, vec!["spam".to_string(), "ham".to_string()]);
        assert!((x[[1, 0]] - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_missing_label_column_lists_available() {
        let file = write_csv(&["embedding,category", "\"[0.1]\",spam"]);
        let err = DataLoader::load(file.path(), Some("embedding"), "label").unwrap_err();
        match err {
            ClfBenchError::SchemaError { column, available } => {
                assert_eq!(column, "label");
                assert_eq!(available, vec!["embedding".to_string(), "category".to_string()]);
            }
            other => panic!("expected SchemaError, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_source() {
        let err =
            DataLoader::load(Path::new("/no/such/file.csv"), Some("f"), "label").unwrap_err();
        assert!(matches!(err, ClfBenchError::NotFound(_)));
    }

    #[test]
    fn test_unrecognized_format() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        writeln!(file, "junk").unwrap();
        let err = DataLoader::load(file.path(), Some("f"), "label").unwrap_err();
        assert!(matches!(err, ClfBenchError::FormatError(_)));
    }

    #[test]
    fn test_bad_row_is_fatal() {
        let file = write_csv(&[
            "embedding,category",
            "\"[0.1, 0.2]\",spam",
            "\"[0.3, oops]\",ham",
        ]);
        let err = DataLoader::load(file.path(), Some("embedding"), "category").unwrap_err();
        match err {
            ClfBenchError::DataError(msg) => assert!(msg.contains("row 1")),
            other => panic!("expected DataError, got {other:?}"),
        }
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let file = write_csv(&[
            "embedding,category",
            "\"[0.1, 0.2]\",spam",
            "\"[0.3]\",ham",
        ]);
        let err = DataLoader::load(file.path(), Some("embedding"), "category").unwrap_err();
        assert!(matches!(err, ClfBenchError::ShapeError { .. }));
    }

    #[test]
    fn test_csv_without_feature_column_name() {
        let file = write_csv(&["embedding,category", "\"[0.1]\",spam"]);
        let err = DataLoader::load(file.path(), None, "category").unwrap_err();
        assert!(matches!(err, ClfBenchError::FormatError(_)));
    }
}
