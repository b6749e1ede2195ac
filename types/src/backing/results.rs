use serde::{Deserialize, Serialize};

use super::OVERSOLD_EPSILON;

/// Projected or settled payout for one investment.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackerPayout {
    pub backer_id: String,
    pub backer_name: String,
    pub investment_amount: f64,
    pub payout: f64,
    /// Return on investment in percent (`345.45` means +345.45%).
    pub roi: f64,
}

/// Full breakdown of how a prize is shared between a player and their backers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackingResults {
    pub total_invested: f64,
    pub total_percentage_sold: f64,
    /// Share kept by the player. Negative when the offer is oversold.
    pub player_percentage: f64,
    pub prize_amount: f64,
    pub net_prize: f64,
    pub player_profit: f64,
    /// One entry per investment, in input order.
    pub payouts: Vec<BackerPayout>,
}

impl BackingResults {
    pub fn total_payout(&self) -> f64 {
        self.payouts.iter().map(|p| p.payout).sum()
    }

    pub fn is_oversold(&self) -> bool {
        self.player_percentage < -OVERSOLD_EPSILON
    }
}

/// Row handed to the settlement recorder for persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    pub investment_id: String,
    pub backer_name: String,
    pub payout: f64,
    pub roi: f64,
}
