//! Settles many offers at once for dashboards and bulk recording.
//!
//! Offers are independent, so with the `parallel` feature the batch is spread over the rayon
//! thread pool. Output order always matches input order.

use serde::{Deserialize, Serialize};
use stakebook_types::{BackingResults, Investment, OfferTerms, PayoutRecord};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::settlement::{calculate_for_offer, record_settlement};

/// One offer and the result it is being settled against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferSettlement {
    pub offer_id: String,
    pub terms: OfferTerms,
    pub prize_amount: f64,
    #[serde(default)]
    pub investments: Vec<Investment>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPreview {
    pub offer_id: String,
    pub results: BackingResults,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecords {
    pub offer_id: String,
    pub records: Vec<PayoutRecord>,
}

fn preview_one(offer: &OfferSettlement) -> OfferPreview {
    OfferPreview {
        offer_id: offer.offer_id.clone(),
        results: calculate_for_offer(&offer.terms, offer.prize_amount, &offer.investments),
    }
}

fn record_one(offer: &OfferSettlement) -> OfferRecords {
    OfferRecords {
        offer_id: offer.offer_id.clone(),
        records: record_settlement(&offer.terms, offer.prize_amount, &offer.investments),
    }
}

#[cfg(feature = "parallel")]
fn map_offers<T: Send>(
    offers: &[OfferSettlement],
    settle: fn(&OfferSettlement) -> T,
) -> Vec<T> {
    offers.par_iter().map(settle).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_offers<T>(offers: &[OfferSettlement], settle: fn(&OfferSettlement) -> T) -> Vec<T> {
    offers.iter().map(settle).collect()
}

/// Projected payouts for every offer.
pub fn preview_batch(offers: &[OfferSettlement]) -> Vec<OfferPreview> {
    map_offers(offers, preview_one)
}

/// Payout rows for every offer, ready for the settlement recorder.
pub fn record_batch(offers: &[OfferSettlement]) -> Vec<OfferRecords> {
    map_offers(offers, record_one)
}
