//! Anomaly prediction domain models

use serde::{Deserialize, Serialize};

/// Feature vector accepted by POST /predict-anomalies/
///
/// Pass-through input for the classifier artifact; field order of
/// [`AnomalyQuery::features`] matches the order the model was trained with.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnomalyQuery {
    pub avg_rtt: f64,
    pub max_rtt: f64,
    pub num_hops: u32,
    pub packet_loss: f64,
    pub jitter: f64,
}

impl AnomalyQuery {
    /// All float inputs must be finite and non-negative.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("avg_rtt", self.avg_rtt),
            ("max_rtt", self.max_rtt),
            ("packet_loss", self.packet_loss),
            ("jitter", self.jitter),
        ] {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number", name));
            }
            if value < 0.0 {
                return Err(format!("{} must be non-negative", name));
            }
        }
        Ok(())
    }

    /// Feature vector in model training order
    pub fn features(&self) -> [f64; 5] {
        [
            self.avg_rtt,
            self.max_rtt,
            self.num_hops as f64,
            self.packet_loss,
            self.jitter,
        ]
    }
}
