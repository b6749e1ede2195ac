//! Per-backer totals across settled offers.

use serde::{Deserialize, Serialize};
use stakebook_types::{Investment, PayoutRecord};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

use crate::settlement::roi_percent;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackerSummary {
    pub backer_name: String,
    /// Distinct offers the backer holds action in.
    pub offers: usize,
    pub total_invested: f64,
    pub total_payout: f64,
    pub net_profit: f64,
    pub roi: f64,
}

#[derive(Clone, Debug, Default)]
struct Totals {
    offers: BTreeSet<String>,
    invested: f64,
    payout: f64,
}

/// Accumulates settled payouts keyed by backer name.
///
/// Backed by a `BTreeMap` so summaries come out sorted by name regardless of insertion order.
#[derive(Clone, Debug, Default)]
pub struct BackerLedger {
    backers: BTreeMap<String, Totals>,
}

impl BackerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one offer's payout records, pairing each with its investment.
    ///
    /// Records produced by [`crate::record_settlement`] line up with `investments` by
    /// position, so duplicate investment ids still pair one to one. Records out of that order
    /// fall back to the first investment with the same id. A record with no matching
    /// investment counts as zero invested.
    pub fn add_settlement(
        &mut self,
        offer_id: &str,
        investments: &[Investment],
        records: &[PayoutRecord],
    ) {
        for (idx, record) in records.iter().enumerate() {
            let invested = match paired_amount(investments, idx, record) {
                Some(amount) => amount,
                None => {
                    warn!(
                        offer_id,
                        investment_id = %record.investment_id,
                        "payout record without investment"
                    );
                    0.0
                }
            };
            let totals = self.backers.entry(record.backer_name.clone()).or_default();
            totals.offers.insert(offer_id.to_string());
            totals.invested += invested;
            totals.payout += record.payout;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.backers.is_empty()
    }

    pub fn get(&self, backer_name: &str) -> Option<BackerSummary> {
        self.backers
            .get_key_value(backer_name)
            .map(|(name, totals)| summarize(name, totals))
    }

    /// Summaries sorted by backer name.
    pub fn summaries(&self) -> Vec<BackerSummary> {
        self.backers
            .iter()
            .map(|(name, totals)| summarize(name, totals))
            .collect()
    }
}

fn paired_amount(investments: &[Investment], idx: usize, record: &PayoutRecord) -> Option<f64> {
    if let Some(investment) = investments.get(idx) {
        if investment.id == record.investment_id {
            return Some(investment.amount_paid);
        }
    }
    let mut matches = investments
        .iter()
        .filter(|i| i.id == record.investment_id);
    let first = matches.next()?;
    if matches.next().is_some() {
        warn!(
            investment_id = %record.investment_id,
            "duplicate investment id, pairing with the first"
        );
    }
    Some(first.amount_paid)
}

fn summarize(name: &str, totals: &Totals) -> BackerSummary {
    BackerSummary {
        backer_name: name.to_string(),
        offers: totals.offers.len(),
        total_invested: totals.invested,
        total_payout: totals.payout,
        net_profit: totals.payout - totals.invested,
        roi: roi_percent(totals.payout, totals.invested),
    }
}
