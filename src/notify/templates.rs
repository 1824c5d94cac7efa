//! HTML email bodies for confirmations and receipts.
//!
//! Rendered with Askama from `templates/email/`. Interpolated values are
//! HTML-escaped by the template engine.

use askama::Template;

use super::NotifyError;
use crate::models::{Donation, Signature};

/// HTML template for a signature confirmation.
#[derive(Template)]
#[template(path = "email/signature_confirmation.html")]
struct SignatureConfirmationHtml<'a> {
    name: &'a str,
    id: &'a str,
}

/// HTML template for a donation receipt.
#[derive(Template)]
#[template(path = "email/donation_receipt.html")]
struct DonationReceiptHtml<'a> {
    email: &'a str,
    amount: String,
    transaction: &'a str,
    date: String,
}

/// Subject and body for a signature confirmation.
pub fn signature_confirmation(signature: &Signature) -> Result<(String, String), NotifyError> {
    let html = SignatureConfirmationHtml {
        name: &signature.full_name,
        id: &signature.id,
    }
    .render()?;

    Ok(("Your Petition Signature Has Been Recorded".to_string(), html))
}

/// Subject and body for a donation receipt.
pub fn donation_receipt(donation: &Donation) -> Result<(String, String), NotifyError> {
    let amount = format!("{:.2}", donation.amount);
    let html = DonationReceiptHtml {
        email: &donation.email,
        amount: amount.clone(),
        transaction: donation.transaction_id.as_deref().unwrap_or("Pending"),
        date: donation.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
    }
    .render()?;

    Ok((format!("LivePay Donation Receipt - ${amount}"), html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn donation(transaction_id: Option<&str>) -> Donation {
        Donation {
            id: "d1".into(),
            email: "donor@example.com".into(),
            amount: 25.0,
            transaction_id: transaction_id.map(String::from),
            paypal_email: None,
            timestamp: Utc.with_ymd_and_hms(2026, 2, 1, 12, 30, 0).unwrap(),
            receipt_sent: false,
        }
    }

    #[test]
    fn test_receipt_subject_has_amount() {
        let (subject, html) = donation_receipt(&donation(Some("TX-9"))).unwrap();
        assert_eq!(subject, "LivePay Donation Receipt - $25.00");
        assert!(html.contains("$25.00"));
        assert!(html.contains("TX-9"));
        assert!(html.contains("2026-02-01 12:30 UTC"));
        assert!(html.contains("support@livepay.org"));
    }

    #[test]
    fn test_receipt_pending_transaction() {
        let (_, html) = donation_receipt(&donation(None)).unwrap();
        assert!(html.contains("Pending"));
    }

    #[test]
    fn test_confirmation_escapes_name() {
        let signature = Signature {
            id: "42".into(),
            full_name: "<script>alert(1)</script>".into(),
            email: "a@b.com".into(),
            city: "c".into(),
            state: "s".into(),
            zip: "12345".into(),
            country: "United States".into(),
            timestamp: Utc::now(),
            notifications_sent: false,
        };
        let (subject, html) = signature_confirmation(&signature).unwrap();
        assert!(subject.contains("Signature"));
        assert!(html.contains("Signature #42"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
