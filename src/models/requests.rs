//! Request DTOs for the petition API
//!
//! Defines the structure of incoming HTTP request bodies. Every field is
//! optional at the serde level so that absent fields surface as a
//! "Missing required fields" validation error instead of a parse error.

use serde::Deserialize;

use crate::validation::{is_valid_email, is_valid_zip};

/// Request body for POST /api/petition/sign
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SignPetitionRequest {
    pub full_name: String,
    pub email: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    /// Signer attests they are who they claim to be
    pub certified: bool,
    /// Signer wants a confirmation email
    pub send_notifications: bool,
}

impl SignPetitionRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let required = [
            &self.full_name,
            &self.email,
            &self.city,
            &self.state,
            &self.zip,
            &self.country,
        ];
        if required.iter().any(|field| field.trim().is_empty()) {
            return Some("Missing required fields".to_string());
        }
        if !is_valid_email(&self.email) {
            return Some("Invalid email address".to_string());
        }
        if !is_valid_zip(&self.zip) {
            return Some("Invalid ZIP code".to_string());
        }
        if !self.certified {
            return Some("Must certify identity".to_string());
        }
        None
    }
}

/// Donation amount as submitted: clients send either a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Amount {
    /// Coerces the submitted amount to a float, None when not numeric.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Amount::Number(n) => Some(*n),
            Amount::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Request body for POST /api/donation/track
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackDonationRequest {
    pub email: String,
    pub amount: Option<Amount>,
    pub transaction_id: Option<String>,
    pub paypal_email: Option<String>,
    /// Donor wants a receipt email
    pub send_receipt: bool,
}

impl TrackDonationRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        let amount_missing = match &self.amount {
            None => true,
            Some(Amount::Text(s)) => s.trim().is_empty(),
            Some(Amount::Number(_)) => false,
        };
        if self.email.trim().is_empty() || amount_missing {
            return Some("Missing required fields".to_string());
        }
        if !is_valid_email(&self.email) {
            return Some("Invalid email address".to_string());
        }
        match self.parsed_amount() {
            Some(amount) if amount.is_finite() && amount > 0.0 => None,
            _ => Some("Invalid donation amount".to_string()),
        }
    }

    /// The submitted amount coerced to a float.
    pub fn parsed_amount(&self) -> Option<f64> {
        self.amount.as_ref().and_then(Amount::to_f64)
    }
}

/// Treats blank optional strings the same as absent ones.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
