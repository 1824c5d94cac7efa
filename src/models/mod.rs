//! Record, request and response models for the petition server
//!
//! This module defines the persisted records and the DTOs used for
//! serializing/deserializing HTTP request and response bodies.

pub mod records;
pub mod requests;
pub mod responses;
pub mod stats;

// Re-export commonly used types
pub use records::{new_record_id, Donation, Signature};
pub use requests::{Amount, SignPetitionRequest, TrackDonationRequest};
pub use responses::{
    CountResponse, DonationListResponse, DonationResponse, ErrorResponse, HealthResponse,
    SignResponse, SignatureListResponse, StatsResponse,
};
pub use stats::{DonationSummary, SignatureBreakdown};
