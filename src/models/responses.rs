//! Response DTOs for the petition API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::records::{Donation, Signature};
use super::stats::{DonationSummary, SignatureBreakdown};

/// Response body for POST /api/petition/sign
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignResponse {
    pub success: bool,
    pub message: String,
    pub signature: Signature,
    /// Signature count after this one was recorded
    pub total_signatures: usize,
}

impl SignResponse {
    /// Creates a new SignResponse
    pub fn new(signature: Signature, total_signatures: usize, confirmation_queued: bool) -> Self {
        let mut message = "Signature recorded successfully".to_string();
        if confirmation_queued {
            message.push_str(", confirmation email queued");
        }
        Self {
            success: true,
            message,
            signature,
            total_signatures,
        }
    }
}

/// Response body for GET /api/petition/signatures/count
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: usize,
}

/// Response body for GET /api/petition/signatures
#[derive(Debug, Clone, Serialize)]
pub struct SignatureListResponse {
    pub signatures: Vec<Signature>,
    pub total: usize,
}

impl SignatureListResponse {
    pub fn new(signatures: Vec<Signature>) -> Self {
        let total = signatures.len();
        Self { signatures, total }
    }
}

/// Response body for POST /api/donation/track
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationResponse {
    pub success: bool,
    pub message: String,
    pub donation: Donation,
    /// Donation count after this one was recorded
    pub total_donations: usize,
}

impl DonationResponse {
    /// Creates a new DonationResponse
    pub fn new(donation: Donation, total_donations: usize, receipt_queued: bool) -> Self {
        let mut message = "Donation tracked".to_string();
        if receipt_queued {
            message.push_str(", receipt queued");
        }
        Self {
            success: true,
            message,
            donation,
            total_donations,
        }
    }
}

/// Response body for GET /api/donation/list
#[derive(Debug, Clone, Serialize)]
pub struct DonationListResponse {
    pub donations: Vec<Donation>,
    pub total: f64,
    pub count: usize,
}

impl DonationListResponse {
    pub fn new(donations: Vec<Donation>) -> Self {
        let summary = DonationSummary::from_donations(&donations);
        Self {
            total: summary.total,
            count: summary.count,
            donations,
        }
    }
}

/// Response body for GET /api/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub signatures: SignatureBreakdown,
    pub donations: DonationSummary,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
