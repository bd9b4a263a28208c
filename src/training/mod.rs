//! Training, evaluation and selection
//!
//! The [`ComparisonEngine`] drives the whole flow: one shared stratified
//! split, one fit/predict/score pass per configuration, then best-model
//! selection by weighted F1.

mod engine;
mod metrics;
mod selector;

pub use engine::{ComparisonConfig, ComparisonEngine, ComparisonOutcome};
pub use metrics::ClassificationMetrics;
pub use selector::select_best;
