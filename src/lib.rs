//! clfbench - Batch classifier comparison harness
//!
//! Loads a labeled dataset, trains a set of classifier configurations over
//! one shared stratified split, scores them with support-weighted metrics,
//! and persists a markdown report plus the best fitted model.
//!
//! # Modules
//!
//! - [`data`] - Dataset loading, label encoding, stratified splitting
//! - [`spec`] - Model spec parsing (`"lr:C=2,max_iter=500"`, `"all"`)
//! - [`models`] - Classifier families and the factory that builds them
//! - [`training`] - Train/evaluate orchestration, metrics, best-model selection
//! - [`report`] - Markdown training reports
//! - [`artifact`] - Fitted-model persistence
//! - [`cli`] - Command-line interface

pub mod artifact;
pub mod cli;
pub mod data;
pub mod error;
pub mod models;
pub mod report;
pub mod spec;
pub mod training;

pub use error::{ClfBenchError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::artifact::ArtifactStore;
    pub use crate::data::{stratified_split, DataLoader, DatasetContainer, LabelEncoder, TrainTestSplit};
    pub use crate::error::{ClfBenchError, Result};
    pub use crate::models::{build_model, Classifier, ClassifierModel};
    pub use crate::report::TrainingReport;
    pub use crate::spec::{parse_specs, ModelConfig, ModelFamily, ParamValue};
    pub use crate::training::{
        select_best, ClassificationMetrics, ComparisonConfig, ComparisonEngine, ComparisonOutcome,
    };
}
