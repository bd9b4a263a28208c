//! Model specification parsing
//!
//! Grammar: `spec := name | name ':' paramlist`,
//! `paramlist := param (',' param)*`, `param := key '=' value`.
//! Values coerce integer → float → string, in that order. Family aliases all
//! resolve to one canonical [`ModelFamily`]; the literal token `all` expands
//! to the canonical default set regardless of position.

use crate::error::{ClfBenchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Canonical classifier families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelFamily {
    Knn,
    LogisticRegression,
    RandomForest,
}

impl ModelFamily {
    /// Resolve a user token (alias) to a canonical family
    pub fn from_token(token: &str) -> Result<Self> {
        match token.to_lowercase().as_str() {
            "knn" => Ok(Self::Knn),
            "lr" | "logistic" | "regression" => Ok(Self::LogisticRegression),
            "rf" | "random" | "forest" => Ok(Self::RandomForest),
            _ => Err(ClfBenchError::UnsupportedModel(token.to_string())),
        }
    }

    /// Canonical display name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Knn => "knn",
            Self::LogisticRegression => "logistic-regression",
            Self::RandomForest => "random-forest",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed parameter value, coerced int → float → string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Str(String),
}

impl ParamValue {
    fn coerce(raw: &str) -> Self {
        if let Ok(i) = raw.parse::<i64>() {
            return Self::Int(i);
        }
        if let Ok(f) = raw.parse::<f64>() {
            return Self::Float(f);
        }
        Self::Str(raw.to_string())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// One classifier configuration: canonical family plus its parameters.
/// Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub family: ModelFamily,
    pub params: Vec<(String, ParamValue)>,
}

impl ModelConfig {
    /// A family with no parameters (its defaults)
    pub fn default_for(family: ModelFamily) -> Self {
        Self {
            family,
            params: Vec::new(),
        }
    }

    /// Canonical name used as the results/report key
    pub fn name(&self) -> &'static str {
        self.family.name()
    }
}

/// Parse user-supplied spec tokens into canonical configurations.
///
/// If `all` appears among the tokens, the fixed canonical default set is
/// returned and any sibling specs' parameters are dropped with a diagnostic.
pub fn parse_specs(tokens: &[String]) -> Result<Vec<ModelConfig>> {
    if tokens.iter().any(|t| t == "all") {
        if tokens.len() > 1 {
            warn!("'all' selected; parameters on other model specs are ignored");
        }
        return Ok(vec![
            ModelConfig::default_for(ModelFamily::Knn),
            ModelConfig::default_for(ModelFamily::LogisticRegression),
            ModelConfig::default_for(ModelFamily::RandomForest),
        ]);
    }

    tokens.iter().map(|token| parse_one(token)).collect()
}

fn parse_one(token: &str) -> Result<ModelConfig> {
    let (name, param_str) = match token.split_once(':') {
        Some((name, rest)) => (name, Some(rest)),
        None => (token, None),
    };

    let family = ModelFamily::from_token(name)?;

    let mut params = Vec::new();
    if let Some(param_str) = param_str {
        for part in param_str.split(',') {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                ClfBenchError::InvalidParam {
                    family: family.name().to_string(),
                    name: part.to_string(),
                    reason: "expected key=value".to_string(),
                }
            })?;
            params.push((key.trim().to_string(), ParamValue::coerce(value.trim())));
        }
    }

    Ok(ModelConfig { family, params })
}
