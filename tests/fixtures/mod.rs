//! Canned callback payloads posted by the automation system

#![allow(dead_code)]

use serde_json::{json, Value};

/// Completed callback with a single variant.
pub fn completed_callback(job_id: &str) -> Value {
    json!({
        "job_id": job_id,
        "status": "completed",
        "variants": [{
            "id": "1",
            "url": "https://images.example.com/logo-1.png",
            "score": 0.92,
            "metadata": { "model": "x", "prompt": "y" }
        }]
    })
}

/// Completed callback with three ranked variants.
pub fn gallery_callback(job_id: &str) -> Value {
    json!({
        "job_id": job_id,
        "status": "completed",
        "variants": [
            { "id": "1", "url": "https://images.example.com/1.png", "score": 0.92,
              "metadata": { "model": "sdxl-lora-v1", "prompt": "A sleek futuristic monogram logo" } },
            { "id": "2", "url": "https://images.example.com/2.png", "score": 0.89,
              "metadata": { "model": "sdxl-lora-v1", "prompt": "Modern minimalist logo with clean lines" } },
            { "id": "3", "url": "https://images.example.com/3.png", "score": 0.87,
              "metadata": { "model": "sdxl-lora-v1", "prompt": "Abstract geometric logo with gradients" } }
        ]
    })
}

pub fn failed_callback(job_id: &str, error: &str) -> Value {
    json!({ "job_id": job_id, "status": "failed", "error": error })
}
