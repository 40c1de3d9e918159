//! Dashboard endpoints
//! Mock reporting data for the admin dashboard; no computation behind it.

use crate::models::{
    ContactRequest, DatasetRequest, HealthStatus, NanoparticleType, PredictionDataPoint,
    RequestStats, Stats,
};
use axum::Json;
use chrono::{Duration, Utc};
use rand::Rng;
use serde_json::{json, Value};

const SERIES_DAYS: i64 = 30;

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Dashboard API. Visit /docs for API documentation."
    }))
}

/// GET /health
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        uptime: "5 days, 14 hours".to_string(),
        model_loaded: true,
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /api/dashboard/stats
pub async fn get_stats() -> Json<Stats> {
    Json(Stats {
        total_predictions: 12453,
        avg_response_time_ms: 142.5,
        accuracy: 94.2,
    })
}

/// GET /api/dashboard/predictions-over-time
pub async fn get_predictions_over_time() -> Json<Vec<PredictionDataPoint>> {
    Json(time_series(SERIES_DAYS))
}

/// Daily counts for the last `days` days, oldest first, ending today.
pub fn time_series(days: i64) -> Vec<PredictionDataPoint> {
    let today = Utc::now().date_naive();
    let mut rng = rand::thread_rng();

    (0..days)
        .rev()
        .map(|offset| PredictionDataPoint {
            date: (today - Duration::days(offset)).format("%Y-%m-%d").to_string(),
            count: rng.gen_range(50..=200),
        })
        .collect()
}

/// GET /api/dashboard/request-stats
pub async fn get_request_stats() -> Json<RequestStats> {
    let total = 5000;
    let failed = 125;
    Json(RequestStats {
        total_requests: total,
        successful_requests: total - failed,
        failed_requests: failed,
    })
}

/// GET /api/dashboard/contact-requests
pub async fn get_contact_requests() -> Json<Vec<ContactRequest>> {
    let rows = [
        (
            1,
            "Alice Johnson",
            "alice.j@university.edu",
            "Interested in collaboration on nanoparticle research.",
            "2023-10-25T10:30:00Z",
        ),
        (
            2,
            "Dr. Bob Smith",
            "bsmith@research-lab.org",
            "Question about the model accuracy for gold nanoparticles.",
            "2023-10-24T14:15:00Z",
        ),
        (
            3,
            "Carol Williams",
            "cwilliams@tech-corp.com",
            "Is there an API access available for commercial use?",
            "2023-10-23T09:00:00Z",
        ),
    ];

    Json(
        rows.into_iter()
            .map(|(id, name, email, message, submitted_at)| ContactRequest {
                id,
                name: name.to_string(),
                email: email.to_string(),
                message: message.to_string(),
                submitted_at: submitted_at.to_string(),
            })
            .collect(),
    )
}

/// GET /api/dashboard/dataset-requests
pub async fn get_dataset_requests() -> Json<Vec<DatasetRequest>> {
    let rows = [
        (
            101,
            "MIT",
            "researcher@mit.edu",
            "Silver Nanoparticles",
            "Validation of new synthesis method",
            "2023-10-26T11:20:00Z",
        ),
        (
            102,
            "Stanford University",
            "grad_student@stanford.edu",
            "Gold Nanorods",
            "Machine learning model training comparison",
            "2023-10-25T16:45:00Z",
        ),
        (
            103,
            "Imperial College London",
            "contact@imperial.ac.uk",
            "Carbon Dots",
            "To study optical properties",
            "2023-10-24T08:30:00Z",
        ),
    ];

    Json(
        rows.into_iter()
            .map(
                |(id, institution_name, email, dataset_type, purpose, submitted_at)| {
                    DatasetRequest {
                        id,
                        institution_name: institution_name.to_string(),
                        email: email.to_string(),
                        dataset_type: dataset_type.to_string(),
                        purpose: purpose.to_string(),
                        submitted_at: submitted_at.to_string(),
                    }
                },
            )
            .collect(),
    )
}

/// GET /api/dashboard/nanoparticle-types
pub async fn get_nanoparticle_types() -> Json<Vec<NanoparticleType>> {
    let counts = [
        ("Gold (Au)", 450),
        ("Silver (Ag)", 320),
        ("Iron Oxide (Fe3O4)", 210),
        ("Titanium Dioxide (TiO2)", 150),
        ("Zinc Oxide (ZnO)", 120),
    ];

    Json(
        counts
            .into_iter()
            .map(|(kind, count)| NanoparticleType {
                kind: kind.to_string(),
                count,
            })
            .collect(),
    )
}
