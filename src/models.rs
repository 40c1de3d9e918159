use serde::{Deserialize, Serialize};

/// API liveness and model status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub uptime: String,
    pub model_loaded: bool,
    pub api_version: String,
}

/// Dashboard KPI tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub total_predictions: u64,
    pub avg_response_time_ms: f64,
    pub accuracy: f64, // percent
}

/// One day of the predictions chart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionDataPoint {
    pub date: String, // YYYY-MM-DD
    pub count: u32,
}

/// Successful vs failed requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestStats {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
}

/// Contact form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactRequest {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: String,
}

/// Dataset share submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetRequest {
    pub id: u32,
    pub institution_name: String,
    pub email: String,
    pub dataset_type: String,
    pub purpose: String,
    pub submitted_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NanoparticleType {
    #[serde(rename = "type")]
    pub kind: String,
    pub count: u32,
}
