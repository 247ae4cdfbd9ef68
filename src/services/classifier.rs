//! Anomaly classifier collaborator
//!
//! Loads a pre-trained linear decision function from a JSON artifact once
//! at startup. The artifact is read-only and shared across all requests;
//! absence is a recoverable condition (the prediction endpoint reports it,
//! the service keeps running).

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

/// Number of input features: avg_rtt, max_rtt, num_hops, packet_loss, jitter
pub const FEATURE_COUNT: usize = 5;

/// Classification outcome, matching the original model contract
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Prediction {
    /// Model output -1
    Anomaly,
    /// Model output 1
    Normal,
}

impl Prediction {
    pub fn as_i8(&self) -> i8 {
        match self {
            Prediction::Anomaly => -1,
            Prediction::Normal => 1,
        }
    }
}

/// On-disk artifact format
#[derive(Debug, Deserialize)]
struct ModelFile {
    weights: Vec<f64>,
    bias: f64,
}

/// Pre-trained anomaly classifier
#[derive(Debug)]
pub struct AnomalyClassifier {
    weights: [f64; FEATURE_COUNT],
    bias: f64,
}

impl AnomalyClassifier {
    /// Load the artifact if it exists. A missing file disables the feature;
    /// a malformed file is treated the same way (logged, never fatal).
    pub fn load(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Classifier artifact not found; prediction disabled");
            return None;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read classifier artifact");
                return None;
            }
        };

        let model: ModelFile = match serde_json::from_str(&contents) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to parse classifier artifact");
                return None;
            }
        };

        let weights = match <[f64; FEATURE_COUNT]>::try_from(model.weights) {
            Ok(w) => w,
            Err(got) => {
                warn!(
                    path = %path.display(),
                    expected = FEATURE_COUNT,
                    got = got.len(),
                    "Classifier artifact has wrong feature count"
                );
                return None;
            }
        };

        info!(path = %path.display(), "Loaded classifier artifact");
        Some(Self {
            weights,
            bias: model.bias,
        })
    }

    /// Score a feature vector. Negative decision values are anomalies,
    /// matching the -1/1 contract of the original model.
    pub fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Prediction {
        let score: f64 = self
            .weights
            .iter()
            .zip(features.iter())
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.bias;

        if score < 0.0 {
            Prediction::Anomaly
        } else {
            Prediction::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_model(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_missing_file_disables_feature() {
        assert!(AnomalyClassifier::load("/nonexistent/model.json").is_none());
    }

    #[test]
    fn test_malformed_file_disables_feature() {
        let file = write_model("{ not json");
        assert!(AnomalyClassifier::load(file.path()).is_none());
    }

    #[test]
    fn test_wrong_feature_count_rejected() {
        let file = write_model(r#"{"weights": [1.0, 2.0], "bias": 0.0}"#);
        assert!(AnomalyClassifier::load(file.path()).is_none());
    }

    #[test]
    fn test_predict_sign_convention() {
        let file = write_model(
            r#"{"weights": [-1.0, 0.0, 0.0, -1.0, 0.0], "bias": 50.0}"#,
        );
        let model = AnomalyClassifier::load(file.path()).unwrap();

        // Low latency, no loss: decision value positive
        assert_eq!(model.predict(&[10.0, 20.0, 5.0, 0.0, 1.0]), Prediction::Normal);
        assert_eq!(model.predict(&[10.0, 20.0, 5.0, 0.0, 1.0]).as_i8(), 1);

        // High latency and loss push the score negative
        assert_eq!(
            model.predict(&[200.0, 500.0, 20.0, 30.0, 50.0]),
            Prediction::Anomaly
        );
        assert_eq!(model.predict(&[200.0, 500.0, 20.0, 30.0, 50.0]).as_i8(), -1);
    }
}
