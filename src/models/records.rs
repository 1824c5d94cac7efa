//! Persisted record types
//!
//! These are the shapes written to the JSON record files, so field names
//! are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a time-ordered record id.
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

// == Signature ==
/// One petition signature. Unique by email across the collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    pub timestamp: DateTime<Utc>,
    /// Set once a confirmation email has been delivered
    #[serde(default)]
    pub notifications_sent: bool,
}

// == Donation ==
/// One tracked donation. Multiple donations per email are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub email: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub paypal_email: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Set once a receipt email has been delivered
    #[serde(default)]
    pub receipt_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ids_are_unique() {
        let a = new_record_id();
        let b = new_record_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_signature_camel_case_fields() {
        let sig = Signature {
            id: "1".into(),
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            city: "London".into(),
            state: "NY".into(),
            zip: "10001".into(),
            country: "United States".into(),
            timestamp: Utc::now(),
            notifications_sent: false,
        };
        let json = serde_json::to_value(&sig).unwrap();
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["notificationsSent"], false);
    }

    #[test]
    fn test_donation_nullable_fields() {
        let json = r#"{
            "id": "1",
            "email": "a@b.com",
            "amount": 25.5,
            "transactionId": null,
            "paypalEmail": null,
            "timestamp": "2026-02-01T12:00:00Z"
        }"#;
        let donation: Donation = serde_json::from_str(json).unwrap();
        assert!(donation.transaction_id.is_none());
        assert!(!donation.receipt_sent);
        assert_eq!(donation.amount, 25.5);
    }
}
