//! Builds a fittable classifier from a parsed configuration
//!
//! One arm per canonical family, each with an explicit accepted-parameter
//! set. Anything else is rejected with [`ClfBenchError::InvalidParam`].

use crate::error::{ClfBenchError, Result};
use crate::models::{
    ClassifierModel, DistanceMetric, KnnClassifier, LogisticRegression, RandomForestClassifier,
    WeightScheme,
};
use crate::spec::{ModelConfig, ModelFamily, ParamValue};

/// Build an unfitted classifier for `config`
pub fn build_model(config: &ModelConfig) -> Result<ClassifierModel> {
    match config.family {
        ModelFamily::Knn => build_knn(config),
        ModelFamily::LogisticRegression => build_logistic(config),
        ModelFamily::RandomForest => build_forest(config),
    }
}

fn build_knn(config: &ModelConfig) -> Result<ClassifierModel> {
    let mut model = KnnClassifier::default();

    for (key, value) in &config.params {
        match key.as_str() {
            "n_neighbors" => model.n_neighbors = positive_int(config.family, key, value)?,
            "weights" => {
                model.weights = match str_value(config.family, key, value)? {
                    "uniform" => WeightScheme::Uniform,
                    "distance" => WeightScheme::Distance,
                    other => return Err(invalid(config.family, key, format!("unknown weighting '{other}'"))),
                }
            }
            "metric" => {
                model.metric = match str_value(config.family, key, value)? {
                    "euclidean" => DistanceMetric::Euclidean,
                    "manhattan" => DistanceMetric::Manhattan,
                    other => return Err(invalid(config.family, key, format!("unknown metric '{other}'"))),
                }
            }
            _ => return Err(unknown_key(config.family, key)),
        }
    }

    Ok(ClassifierModel::Knn(model))
}

fn build_logistic(config: &ModelConfig) -> Result<ClassifierModel> {
    // Iteration cap defaults to 1000; an explicit max_iter overrides it
    let mut model = LogisticRegression::new();

    for (key, value) in &config.params {
        match key.as_str() {
            "C" | "c" => {
                let c = positive_float(config.family, key, value)?;
                model = model.with_alpha(1.0 / c);
            }
            "max_iter" => model = model.with_max_iter(positive_int(config.family, key, value)?),
            "learning_rate" => {
                model = model.with_learning_rate(positive_float(config.family, key, value)?)
            }
            "tol" => model = model.with_tol(positive_float(config.family, key, value)?),
            _ => return Err(unknown_key(config.family, key)),
        }
    }

    Ok(ClassifierModel::LogisticRegression(model))
}

fn build_forest(config: &ModelConfig) -> Result<ClassifierModel> {
    let mut model = RandomForestClassifier::default();

    for (key, value) in &config.params {
        match key.as_str() {
            "n_estimators" => model.n_estimators = positive_int(config.family, key, value)?,
            "max_depth" => model.max_depth = Some(positive_int(config.family, key, value)?),
            "min_samples_split" => {
                model.min_samples_split = positive_int(config.family, key, value)?
            }
            "min_samples_leaf" => model.min_samples_leaf = positive_int(config.family, key, value)?,
            "random_state" => {
                let seed = match value {
                    ParamValue::Int(i) if *i >= 0 => *i as u64,
                    _ => return Err(invalid(config.family, key, "expected a non-negative integer".to_string())),
                };
                model.random_state = Some(seed);
            }
            _ => return Err(unknown_key(config.family, key)),
        }
    }

    Ok(ClassifierModel::RandomForest(model))
}

fn positive_int(family: ModelFamily, key: &str, value: &ParamValue) -> Result<usize> {
    match value {
        ParamValue::Int(i) if *i >= 1 => Ok(*i as usize),
        _ => Err(invalid(family, key, "expected a positive integer".to_string())),
    }
}

fn positive_float(family: ModelFamily, key: &str, value: &ParamValue) -> Result<f64> {
    let v = match value {
        ParamValue::Int(i) => *i as f64,
        ParamValue::Float(f) => *f,
        ParamValue::Str(_) => {
            return Err(invalid(family, key, "expected a number".to_string()));
        }
    };
    if v > 0.0 {
        Ok(v)
    } else {
        Err(invalid(family, key, "expected a positive number".to_string()))
    }
}

fn str_value<'a>(family: ModelFamily, key: &str, value: &'a ParamValue) -> Result<&'a str> {
    match value {
        ParamValue::Str(s) => Ok(s.as_str()),
        _ => Err(invalid(family, key, "expected a string".to_string())),
    }
}

fn invalid(family: ModelFamily, key: &str, reason: String) -> ClfBenchError {
    ClfBenchError::InvalidParam {
        family: family.name().to_string(),
        name: key.to_string(),
        reason,
    }
}

fn unknown_key(family: ModelFamily, key: &str) -> ClfBenchError {
    invalid(family, key, "not an accepted parameter for this family".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::parse_specs;

    fn config_for(spec: &str) -> ModelConfig {
        parse_specs(&[spec.to_string()]).unwrap().remove(0)
    }

    #[test]
    fn test_build_knn_with_params() {
        let model = build_model(&config_for("knn:n_neighbors=3,weights=distance")).unwrap();
        match model {
            ClassifierModel::Knn(knn) => {
                assert_eq!(knn.n_neighbors, 3);
                assert_eq!(knn.weights, WeightScheme::Distance);
            }
            other => panic!("expected knn, got {other:?}"),
        }
    }

    #[test]
    fn test_logistic_iteration_cap_default() {
        let model = build_model(&config_for("lr")).unwrap();
        match model {
            ClassifierModel::LogisticRegression(lr) => assert_eq!(lr.max_iter, 1000),
            other => panic!("expected logistic regression, got {other:?}"),
        }
    }

    #[test]
    fn test_logistic_c_and_max_iter() {
        let model = build_model(&config_for("lr:C=2,max_iter=500")).unwrap();
        match model {
            ClassifierModel::LogisticRegression(lr) => {
                assert_eq!(lr.max_iter, 500);
                assert!((lr.alpha - 0.5).abs() < 1e-12);
            }
            other => panic!("expected logistic regression, got {other:?}"),
        }
    }

    #[test]
    fn test_forest_params() {
        let model = build_model(&config_for("rf:n_estimators=50,max_depth=4")).unwrap();
        match model {
            ClassifierModel::RandomForest(rf) => {
                assert_eq!(rf.n_estimators, 50);
                assert_eq!(rf.max_depth, Some(4));
            }
            other => panic!("expected random forest, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_param_rejected_by_name() {
        let err = build_model(&config_for("knn:kernel=rbf")).unwrap_err();
        match err {
            ClfBenchError::InvalidParam { name, family, .. } => {
                assert_eq!(name, "kernel");
                assert_eq!(family, "knn");
            }
            other => panic!("expected InvalidParam, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_type_rejected() {
        assert!(build_model(&config_for("knn:n_neighbors=many")).is_err());
        assert!(build_model(&config_for("lr:C=0")).is_err());
        assert!(build_model(&config_for("rf:n_estimators=0")).is_err());
    }
}
