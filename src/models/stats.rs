//! Campaign aggregates
//!
//! Read-only summaries computed from the full record sets on each request.

use std::collections::BTreeMap;

use serde::Serialize;

use super::records::{Donation, Signature};

// == Donation Summary ==
/// Total, count and average of all tracked donations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonationSummary {
    pub total: f64,
    pub count: usize,
    /// total / count rounded to cents, 0 when there are no donations
    pub average: f64,
}

impl DonationSummary {
    pub fn from_donations(donations: &[Donation]) -> Self {
        let total: f64 = donations.iter().map(|d| d.amount).sum();
        let count = donations.len();
        let average = if count > 0 {
            round_cents(total / count as f64)
        } else {
            0.0
        };
        Self {
            total,
            count,
            average,
        }
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// == Signature Breakdown ==
/// Signature counts grouped by country, plus by state for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureBreakdown {
    pub count: usize,
    pub by_country: BTreeMap<String, usize>,
    pub by_state: BTreeMap<String, usize>,
}

impl SignatureBreakdown {
    /// `state_country` selects which signatures contribute to `by_state`.
    pub fn from_signatures(signatures: &[Signature], state_country: &str) -> Self {
        let mut by_country = BTreeMap::new();
        let mut by_state = BTreeMap::new();

        for sig in signatures {
            *by_country.entry(sig.country.clone()).or_insert(0) += 1;
            if sig.country == state_country {
                *by_state.entry(sig.state.clone()).or_insert(0) += 1;
            }
        }

        Self {
            count: signatures.len(),
            by_country,
            by_state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use proptest::prelude::*;

    fn signature(country: &str, state: &str) -> Signature {
        Signature {
            id: "s".into(),
            full_name: "Name".into(),
            email: "x@y.com".into(),
            city: "City".into(),
            state: state.into(),
            zip: "12345".into(),
            country: country.into(),
            timestamp: Utc::now(),
            notifications_sent: false,
        }
    }

    fn donation(amount: f64) -> Donation {
        Donation {
            id: "d".into(),
            email: "x@y.com".into(),
            amount,
            transaction_id: None,
            paypal_email: None,
            timestamp: Utc::now(),
            receipt_sent: false,
        }
    }

    #[test]
    fn test_empty_donations_average_zero() {
        let summary = DonationSummary::from_donations(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total, 0.0);
        assert_eq!(summary.average, 0.0);
    }

    #[test]
    fn test_average_rounded_to_cents() {
        let summary = DonationSummary::from_donations(&[donation(10.0), donation(5.0), donation(5.0)]);
        assert_eq!(summary.count, 3);
        assert_eq!(summary.total, 20.0);
        assert_eq!(summary.average, 6.67);
    }

    #[test]
    fn test_by_state_only_for_designated_country() {
        let sigs = [
            signature("United States", "CA"),
            signature("United States", "CA"),
            signature("United States", "NY"),
            signature("Canada", "ON"),
        ];
        let breakdown = SignatureBreakdown::from_signatures(&sigs, "United States");

        assert_eq!(breakdown.count, 4);
        assert_eq!(breakdown.by_country["United States"], 3);
        assert_eq!(breakdown.by_country["Canada"], 1);
        assert_eq!(breakdown.by_state["CA"], 2);
        assert_eq!(breakdown.by_state["NY"], 1);
        assert!(!breakdown.by_state.contains_key("ON"));
    }

    #[test]
    fn test_breakdown_serializes_camel_case() {
        let breakdown = SignatureBreakdown::from_signatures(&[], "United States");
        let json = serde_json::to_value(&breakdown).unwrap();
        assert!(json.get("byCountry").is_some());
        assert!(json.get("byState").is_some());
    }

    proptest! {
        #[test]
        fn prop_breakdown_sums_match(
            rows in prop::collection::vec(
                (prop_oneof![Just("United States"), Just("Canada"), Just("Mexico")], "[A-Z]{2}"),
                0..40,
            )
        ) {
            let sigs: Vec<Signature> = rows.iter().map(|(c, s)| signature(c, s)).collect();
            let breakdown = SignatureBreakdown::from_signatures(&sigs, "United States");

            let country_sum: usize = breakdown.by_country.values().sum();
            prop_assert_eq!(country_sum, sigs.len());

            let state_sum: usize = breakdown.by_state.values().sum();
            let us_count = sigs.iter().filter(|s| s.country == "United States").count();
            prop_assert_eq!(state_sum, us_count);
        }

        #[test]
        fn prop_average_is_total_over_count(amounts in prop::collection::vec(0.01f64..10_000.0, 1..30)) {
            let donations: Vec<Donation> = amounts.iter().map(|a| donation(*a)).collect();
            let summary = DonationSummary::from_donations(&donations);
            let expected = (summary.total / donations.len() as f64 * 100.0).round() / 100.0;
            prop_assert_eq!(summary.average, expected);
        }
    }
}
