//! Blood-pressure estimation seam.
//!
//! Both backends share the `BpEstimator` trait so the ingestion path never
//! knows which one is active. The backend is chosen once at startup and the
//! chosen estimator is shared read-only (`Arc<dyn BpEstimator>`) for the
//! lifetime of the process.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use rand::Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

/// Environment variable naming the model artifact path
pub const MODEL_PATH_ENV: &str = "BP_MODEL_PATH";

/// Estimator load errors
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// Artifact file could not be read
    #[error("Failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),

    /// Artifact file could not be parsed
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fixed-order numeric inputs to the estimator
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorInput {
    /// Age in years
    pub age: u32,

    /// Encoded gender category, see [`encode_gender`]
    pub gender_code: f64,

    /// Blood oxygen saturation in percent
    pub spo2: f64,

    /// Heart rate in beats per minute
    pub heart_rate: i64,

    /// Body temperature in °C
    pub temp: f64,
}

impl EstimatorInput {
    /// The model's fixed feature order: age, gender, spo2, heart rate, temp
    fn features(&self) -> [f64; 5] {
        [
            self.age as f64,
            self.gender_code,
            self.spo2,
            self.heart_rate as f64,
            self.temp,
        ]
    }
}

/// Derived blood-pressure estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpEstimate {
    /// Systolic pressure in mmHg
    pub systolic: i64,

    /// Diastolic pressure in mmHg
    pub diastolic: i64,
}

/// Map a free-form gender string onto the numeric category the model was
/// trained with.
pub fn encode_gender(gender: &str) -> f64 {
    match gender.trim().to_lowercase().as_str() {
        "male" | "m" => 0.0,
        "female" | "f" => 1.0,
        _ => 2.0,
    }
}

/// Pure estimator mapping vitals and demographics to a pressure estimate
pub trait BpEstimator: Send + Sync {
    /// Produce a systolic/diastolic estimate for one sample
    fn estimate(&self, input: &EstimatorInput) -> BpEstimate;
}

/// Fallback backend used when no model artifact is available: independent
/// uniform draws, systolic in [110, 130] and diastolic in [70, 90].
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEstimator;

impl BpEstimator for RandomEstimator {
    fn estimate(&self, _input: &EstimatorInput) -> BpEstimate {
        let mut rng = rand::thread_rng();
        BpEstimate {
            systolic: rng.gen_range(110..=130),
            diastolic: rng.gen_range(70..=90),
        }
    }
}

/// One regression output: an intercept plus one weight per input feature
#[derive(Debug, Clone, Deserialize)]
struct OutputWeights {
    intercept: f64,
    weights: [f64; 5],
}

impl OutputWeights {
    fn predict(&self, features: &[f64; 5]) -> i64 {
        let sum: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum();
        (self.intercept + sum).round() as i64
    }
}

/// Serialized regression artifact, one output head per pressure component
#[derive(Debug, Clone, Deserialize)]
struct ModelArtifact {
    systolic: OutputWeights,
    diastolic: OutputWeights,
}

/// Regression backend loaded once from a JSON artifact and immutable
/// afterwards
#[derive(Debug, Clone)]
pub struct LinearModelEstimator {
    artifact: ModelArtifact,
}

impl LinearModelEstimator {
    /// Load the artifact from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, EstimatorError> {
        let file = File::open(path)?;
        let artifact: ModelArtifact = serde_json::from_reader(file)?;
        Ok(Self { artifact })
    }
}

impl BpEstimator for LinearModelEstimator {
    fn estimate(&self, input: &EstimatorInput) -> BpEstimate {
        let features = input.features();
        BpEstimate {
            systolic: self.artifact.systolic.predict(&features),
            diastolic: self.artifact.diastolic.predict(&features),
        }
    }
}

/// Select the estimator backend from the environment, once at startup.
/// A configured but unloadable artifact logs a warning and falls back to the
/// random backend rather than failing startup.
pub fn estimator_from_env() -> Arc<dyn BpEstimator> {
    match std::env::var(MODEL_PATH_ENV) {
        Ok(path) if !path.is_empty() => match LinearModelEstimator::from_file(&path) {
            Ok(model) => {
                info!("Loaded blood-pressure model from {}", path);
                Arc::new(model)
            }
            Err(e) => {
                warn!(
                    "Failed to load blood-pressure model from {}: {}; using random fallback",
                    path, e
                );
                Arc::new(RandomEstimator)
            }
        },
        _ => {
            info!("No blood-pressure model configured; using random fallback");
            Arc::new(RandomEstimator)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> EstimatorInput {
        EstimatorInput {
            age: 45,
            gender_code: encode_gender("female"),
            spo2: 97.0,
            heart_rate: 72,
            temp: 36.6,
        }
    }

    #[test]
    fn random_estimator_stays_in_range() {
        let estimator = RandomEstimator;
        let input = sample_input();
        for _ in 0..1000 {
            let estimate = estimator.estimate(&input);
            assert!((110..=130).contains(&estimate.systolic));
            assert!((70..=90).contains(&estimate.diastolic));
        }
    }

    #[test]
    fn gender_encoding() {
        assert_eq!(encode_gender("male"), 0.0);
        assert_eq!(encode_gender("Female"), 1.0);
        assert_eq!(encode_gender(" F "), 1.0);
        assert_eq!(encode_gender("nonbinary"), 2.0);
    }

    #[test]
    fn linear_model_applies_weights_in_fixed_order() {
        let estimator = LinearModelEstimator {
            artifact: ModelArtifact {
                systolic: OutputWeights {
                    intercept: 100.0,
                    weights: [0.5, 0.0, 0.0, 0.0, 0.0],
                },
                diastolic: OutputWeights {
                    intercept: 60.0,
                    weights: [0.0, 0.0, 0.0, 0.1, 0.0],
                },
            },
        };

        let estimate = estimator.estimate(&sample_input());
        // 100 + 0.5 * 45, rounded
        assert_eq!(estimate.systolic, 123);
        // 60 + 0.1 * 72, rounded
        assert_eq!(estimate.diastolic, 67);
    }

    #[test]
    fn artifact_parses_from_json() {
        let json = r#"{
            "systolic": { "intercept": 92.1, "weights": [0.3, 1.2, -0.1, 0.2, 0.05] },
            "diastolic": { "intercept": 58.7, "weights": [0.1, 0.8, -0.05, 0.15, 0.02] }
        }"#;
        let artifact: ModelArtifact = serde_json::from_str(json).unwrap();
        assert_eq!(artifact.systolic.weights.len(), 5);
    }
}
