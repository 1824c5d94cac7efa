//! API Handlers
//!
//! HTTP request handlers for each petition server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{PetitionError, Result};
use crate::models::requests::non_blank;
use crate::models::{
    new_record_id, CountResponse, Donation, DonationListResponse, DonationResponse,
    DonationSummary, ErrorResponse, HealthResponse, SignPetitionRequest, SignResponse, Signature,
    SignatureBreakdown, SignatureListResponse, StatsResponse, TrackDonationRequest,
};
use crate::notify::{DisabledNotifier, Notifier, SmtpNotifier};
use crate::store::{JsonFileStore, RecordStore};
use crate::tasks::{spawn_notification_task, Delivery};

/// Application state shared across all handlers.
///
/// Read-modify-write cycles on a collection hold that collection's lock,
/// so concurrent submissions cannot both pass the duplicate-email check.
#[derive(Clone)]
pub struct AppState {
    /// Record persistence
    pub store: Arc<dyn RecordStore>,
    /// Outgoing email
    pub notifier: Arc<dyn Notifier>,
    /// Serializes writers to the signature collection
    pub signatures_lock: Arc<Mutex<()>>,
    /// Serializes writers to the donation collection
    pub donations_lock: Arc<Mutex<()>>,
    /// Country broken down by state in `/api/stats`
    pub stats_country: Arc<str>,
    /// Bound on a single email send
    pub email_timeout: Duration,
}

impl AppState {
    /// Creates a new AppState with the given store and notifier.
    pub fn new(store: Arc<dyn RecordStore>, notifier: Arc<dyn Notifier>) -> Self {
        let defaults = Config::default();
        Self {
            store,
            notifier,
            signatures_lock: Arc::new(Mutex::new(())),
            donations_lock: Arc::new(Mutex::new(())),
            stats_country: defaults.stats_country.into(),
            email_timeout: Duration::from_secs(defaults.email.timeout_secs),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens the JSON file store (creating it if needed) and an SMTP
    /// notifier when credentials are present.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = JsonFileStore::open(&config.data_dir).await?;

        let notifier: Arc<dyn Notifier> = if config.email.is_configured() {
            match SmtpNotifier::new(&config.email) {
                Ok(notifier) => {
                    info!("Email service initialized ({})", config.email.host);
                    Arc::new(notifier)
                }
                Err(err) => {
                    warn!("Email service unavailable, receipts disabled: {}", err);
                    Arc::new(DisabledNotifier)
                }
            }
        } else {
            warn!("Email service not configured, receipts disabled");
            Arc::new(DisabledNotifier)
        };

        Ok(Self::new(Arc::new(store), notifier)
            .with_stats_country(config.stats_country.as_str())
            .with_email_timeout(Duration::from_secs(config.email.timeout_secs)))
    }

    pub fn with_stats_country(mut self, country: &str) -> Self {
        self.stats_country = country.into();
        self
    }

    pub fn with_email_timeout(mut self, timeout: Duration) -> Self {
        self.email_timeout = timeout;
        self
    }
}

/// Handler for POST /api/petition/sign
///
/// Records a new signature. Emails already on the petition are rejected
/// with 409.
pub async fn sign_petition_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SignPetitionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SignResponse>)> {
    let Json(req) = payload?;

    if let Some(error_msg) = req.validate() {
        return Err(PetitionError::InvalidRequest(error_msg));
    }

    let (signature, total) = {
        let _guard = state.signatures_lock.lock().await;
        let mut signatures = state.store.load_signatures().await;

        if signatures.iter().any(|sig| sig.email == req.email) {
            return Err(PetitionError::Conflict("Email already signed".to_string()));
        }

        let signature = Signature {
            id: new_record_id(),
            full_name: req.full_name,
            email: req.email,
            city: req.city,
            state: req.state,
            zip: req.zip,
            country: req.country,
            timestamp: Utc::now(),
            notifications_sent: false,
        };

        signatures.push(signature.clone());
        state.store.save_signatures(&signatures).await?;
        (signature, signatures.len())
    };

    info!("Signature {} recorded ({} total)", signature.id, total);

    let queued = req.send_notifications && state.notifier.is_enabled();
    if queued {
        spawn_notification_task(
            state.clone(),
            Delivery::SignatureConfirmation(signature.clone()),
        );
    }

    Ok((
        StatusCode::CREATED,
        Json(SignResponse::new(signature, total, queued)),
    ))
}

/// Handler for GET /api/petition/signatures/count
pub async fn signature_count_handler(State(state): State<AppState>) -> Json<CountResponse> {
    let count = state.store.load_signatures().await.len();
    Json(CountResponse { count })
}

/// Handler for GET /api/petition/signatures
///
/// Unauthenticated: exposes every signature.
pub async fn list_signatures_handler(State(state): State<AppState>) -> Json<SignatureListResponse> {
    Json(SignatureListResponse::new(
        state.store.load_signatures().await,
    ))
}

/// Handler for POST /api/donation/track
pub async fn track_donation_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TrackDonationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<DonationResponse>)> {
    let Json(req) = payload?;

    if let Some(error_msg) = req.validate() {
        return Err(PetitionError::InvalidRequest(error_msg));
    }
    let amount = req
        .parsed_amount()
        .ok_or_else(|| PetitionError::InvalidRequest("Invalid donation amount".to_string()))?;

    let (donation, total) = {
        let _guard = state.donations_lock.lock().await;
        let mut donations = state.store.load_donations().await;

        let donation = Donation {
            id: new_record_id(),
            email: req.email,
            amount,
            transaction_id: non_blank(req.transaction_id),
            paypal_email: non_blank(req.paypal_email),
            timestamp: Utc::now(),
            receipt_sent: false,
        };

        donations.push(donation.clone());
        state.store.save_donations(&donations).await?;
        (donation, donations.len())
    };

    info!("Donation {} of {:.2} tracked", donation.id, donation.amount);

    let queued = req.send_receipt && state.notifier.is_enabled();
    if queued {
        spawn_notification_task(state.clone(), Delivery::DonationReceipt(donation.clone()));
    }

    Ok((
        StatusCode::CREATED,
        Json(DonationResponse::new(donation, total, queued)),
    ))
}

/// Handler for GET /api/donation/total
pub async fn donation_total_handler(State(state): State<AppState>) -> Json<DonationSummary> {
    let donations = state.store.load_donations().await;
    Json(DonationSummary::from_donations(&donations))
}

/// Handler for GET /api/donation/list
///
/// Unauthenticated: exposes every donation.
pub async fn list_donations_handler(State(state): State<AppState>) -> Json<DonationListResponse> {
    Json(DonationListResponse::new(state.store.load_donations().await))
}

/// Handler for GET /api/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let signatures = state.store.load_signatures().await;
    let donations = state.store.load_donations().await;

    Json(StatsResponse {
        signatures: SignatureBreakdown::from_signatures(&signatures, &state.stats_country),
        donations: DonationSummary::from_donations(&donations),
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

/// Fallback for unknown routes.
pub async fn not_found_handler() -> (StatusCode, Json<ErrorResponse>) {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("Not found")))
}
