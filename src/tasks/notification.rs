//! Notification Delivery Task
//!
//! Sends one email per accepted submission with a bounded time budget, then
//! flips `notificationsSent` / `receiptSent` on the stored record if the
//! send succeeded.

use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::api::AppState;
use crate::error::Result;
use crate::models::{Donation, Signature};
use crate::notify::{templates, NotifyError};

/// An email owed to a signer or donor.
#[derive(Debug, Clone)]
pub enum Delivery {
    SignatureConfirmation(Signature),
    DonationReceipt(Donation),
}

impl Delivery {
    fn recipient(&self) -> &str {
        match self {
            Delivery::SignatureConfirmation(sig) => &sig.email,
            Delivery::DonationReceipt(donation) => &donation.email,
        }
    }

    fn render(&self) -> std::result::Result<(String, String), NotifyError> {
        match self {
            Delivery::SignatureConfirmation(sig) => templates::signature_confirmation(sig),
            Delivery::DonationReceipt(donation) => templates::donation_receipt(donation),
        }
    }
}

/// Spawns a task that delivers `delivery` and records the outcome.
///
/// The handle resolves to `true` when the email was sent and the record
/// flag was updated. Callers on the request path drop the handle.
pub fn spawn_notification_task(state: AppState, delivery: Delivery) -> JoinHandle<bool> {
    tokio::spawn(async move {
        let to = delivery.recipient().to_string();
        let (subject, html) = match delivery.render() {
            Ok(rendered) => rendered,
            Err(err) => {
                warn!("Email to {} not rendered: {}", to, err);
                return false;
            }
        };
        let budget = state.email_timeout;

        let sent = match timeout(budget, state.notifier.send(&to, &subject, &html)).await {
            Ok(result) => result,
            Err(_) => Err(NotifyError::Timeout(budget.as_secs())),
        };

        if let Err(err) = sent {
            warn!("Email to {} not delivered: {}", to, err);
            return false;
        }

        match mark_delivered(&state, &delivery).await {
            Ok(true) => true,
            Ok(false) => {
                debug!("Record for {} vanished before delivery was recorded", to);
                false
            }
            Err(err) => {
                warn!("Failed to record delivery to {}: {}", to, err);
                false
            }
        }
    })
}

async fn mark_delivered(state: &AppState, delivery: &Delivery) -> Result<bool> {
    match delivery {
        Delivery::SignatureConfirmation(sig) => {
            let _guard = state.signatures_lock.lock().await;
            let mut signatures = state.store.load_signatures().await;
            let Some(record) = signatures.iter_mut().find(|s| s.id == sig.id) else {
                return Ok(false);
            };
            record.notifications_sent = true;
            state.store.save_signatures(&signatures).await?;
            info!("Confirmation recorded for signature {}", sig.id);
            Ok(true)
        }
        Delivery::DonationReceipt(donation) => {
            let _guard = state.donations_lock.lock().await;
            let mut donations = state.store.load_donations().await;
            let Some(record) = donations.iter_mut().find(|d| d.id == donation.id) else {
                return Ok(false);
            };
            record.receipt_sent = true;
            state.store.save_donations(&donations).await?;
            info!("Receipt recorded for donation {}", donation.id);
            Ok(true)
        }
    }
}
