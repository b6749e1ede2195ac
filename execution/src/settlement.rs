//! Staking settlement math.
//!
//! Every function here is pure: callers fetch offers and investments, and persist whatever
//! comes back. The same per-backer formulas ([`payout_share`] and [`roi_percent`]) back both
//! the live preview ([`calculate_backing_results`]) and settlement-time recording
//! ([`record_settlement`]), so a preview always matches what is eventually recorded.
//!
//! ## Markup semantics
//! - [`calculate_backing_results`] treats `markup_percentage` as a rate: the markup cost
//!   `buy_in_amount * markup_percentage` is subtracted from the gross prize.
//! - [`calculate_investment_amount`] treats its markup argument as a total cost multiplier
//!   (`1.1` for a 10% markup). The two are kept distinct on purpose.

use stakebook_types::{
    validate_settlement, BackerPayout, BackingResults, Investment, OfferInvariantError,
    OfferTerms, PayoutRecord, FULL_ACTION_PERCENT, OVERSOLD_EPSILON,
};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    #[error("invalid settlement input: {0}")]
    Invalid(#[from] OfferInvariantError),
    #[error("offer oversold: player keeps {player_percentage}% of the action")]
    Oversold { player_percentage: f64 },
}

/// Share of `net_prize` owed for `percentage_bought` percent of the action.
pub fn payout_share(percentage_bought: f64, net_prize: f64) -> f64 {
    (percentage_bought / FULL_ACTION_PERCENT) * net_prize
}

/// Return on investment in percent, or `0` when nothing was paid.
pub fn roi_percent(payout: f64, amount_paid: f64) -> f64 {
    if amount_paid > 0.0 {
        ((payout - amount_paid) / amount_paid) * 100.0
    } else {
        0.0
    }
}

/// Gross prize minus the markup cost, floored at zero.
pub fn net_prize(buy_in_amount: f64, markup_percentage: f64, prize_amount: f64) -> f64 {
    let markup_cost = buy_in_amount * markup_percentage;
    (prize_amount - markup_cost).max(0.0)
}

/// Splits a tournament prize between the staked player and their backers.
///
/// # Arguments
/// * `buy_in_amount` - Tournament buy-in.
/// * `markup_percentage` - Markup rate as a fraction (`0.1` for 10%).
/// * `prize_amount` - Gross prize won.
/// * `investments` - Action sold against the offer.
///
/// # Returns
/// A [`BackingResults`] with one payout per investment, in input order. The player's share
/// is not clamped: an oversold offer yields a negative `player_percentage` and
/// `player_profit`. Use [`assert_not_oversold`] to reject those.
pub fn calculate_backing_results(
    buy_in_amount: f64,
    markup_percentage: f64,
    prize_amount: f64,
    investments: &[Investment],
) -> BackingResults {
    let total_percentage_sold: f64 = investments.iter().map(|i| i.percentage_bought).sum();
    let total_invested: f64 = investments.iter().map(|i| i.amount_paid).sum();
    let player_percentage = FULL_ACTION_PERCENT - total_percentage_sold;
    let net_prize = net_prize(buy_in_amount, markup_percentage, prize_amount);
    let player_profit = payout_share(player_percentage, net_prize);

    let payouts = investments
        .iter()
        .map(|investment| {
            let payout = payout_share(investment.percentage_bought, net_prize);
            BackerPayout {
                backer_id: investment.id.clone(),
                backer_name: investment.backer_name.clone(),
                investment_amount: investment.amount_paid,
                payout,
                roi: roi_percent(payout, investment.amount_paid),
            }
        })
        .collect();

    if player_percentage < -OVERSOLD_EPSILON {
        warn!(
            total_percentage_sold,
            player_percentage, "offer oversold, player share is negative"
        );
    }
    debug!(
        investments = investments.len(),
        total_invested,
        net_prize,
        player_profit,
        "computed backing results"
    );

    BackingResults {
        total_invested,
        total_percentage_sold,
        player_percentage,
        prize_amount,
        net_prize,
        player_profit,
        payouts,
    }
}

/// [`calculate_backing_results`] for an [`OfferTerms`] value.
pub fn calculate_for_offer(
    terms: &OfferTerms,
    prize_amount: f64,
    investments: &[Investment],
) -> BackingResults {
    calculate_backing_results(
        terms.buy_in_amount,
        terms.markup_percentage,
        prize_amount,
        investments,
    )
}

/// Validates inputs at the boundary, then settles.
pub fn calculate_checked(
    terms: &OfferTerms,
    prize_amount: f64,
    investments: &[Investment],
) -> Result<BackingResults, SettlementError> {
    validate_settlement(terms, prize_amount, investments)?;
    Ok(calculate_for_offer(terms, prize_amount, investments))
}

/// Price of buying `percentage` percent of the action.
///
/// `markup_factor` multiplies the base cost directly, so it must already encode the total
/// cost (`1.1` for a 10% markup, `1.0` for none).
pub fn calculate_investment_amount(buy_in_amount: f64, percentage: f64, markup_factor: f64) -> f64 {
    (buy_in_amount * (percentage / FULL_ACTION_PERCENT)) * markup_factor
}

/// Derives the payout rows the settlement recorder persists for a finished tournament.
pub fn record_settlement(
    terms: &OfferTerms,
    prize_amount: f64,
    investments: &[Investment],
) -> Vec<PayoutRecord> {
    let net_prize = net_prize(terms.buy_in_amount, terms.markup_percentage, prize_amount);
    let records: Vec<PayoutRecord> = investments
        .iter()
        .map(|investment| {
            let payout = payout_share(investment.percentage_bought, net_prize);
            PayoutRecord {
                investment_id: investment.id.clone(),
                backer_name: investment.backer_name.clone(),
                payout,
                roi: roi_percent(payout, investment.amount_paid),
            }
        })
        .collect();

    let total_payout: f64 = records.iter().map(|r| r.payout).sum();
    info!(
        investments = records.len(),
        net_prize, total_payout, "recorded settlement payouts"
    );
    records
}

/// Fails when backers were sold more than the whole action.
pub fn assert_not_oversold(results: &BackingResults) -> Result<(), SettlementError> {
    if results.is_oversold() {
        return Err(SettlementError::Oversold {
            player_percentage: results.player_percentage,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-9;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6 * (1.0 + a.abs().max(b.abs()))
    }

    fn scenario() -> Vec<Investment> {
        vec![
            Investment::new("inv-1", "alice", 20.0, 220.0),
            Investment::new("inv-2", "bob", 30.0, 330.0),
        ]
    }

    #[test]
    fn test_reference_scenario() {
        let results = calculate_backing_results(1000.0, 0.1, 5000.0, &scenario());

        assert!((results.total_percentage_sold - 50.0).abs() < EPS);
        assert!((results.total_invested - 550.0).abs() < EPS);
        assert!((results.player_percentage - 50.0).abs() < EPS);
        assert_eq!(results.prize_amount, 5000.0);
        assert!((results.net_prize - 4900.0).abs() < EPS);
        assert!((results.player_profit - 2450.0).abs() < EPS);

        assert_eq!(results.payouts.len(), 2);
        let first = &results.payouts[0];
        assert_eq!(first.backer_id, "inv-1");
        assert_eq!(first.backer_name, "alice");
        assert_eq!(first.investment_amount, 220.0);
        assert!((first.payout - 980.0).abs() < EPS);
        assert!((first.roi - 345.4545).abs() < 1e-3);

        let second = &results.payouts[1];
        assert_eq!(second.backer_id, "inv-2");
        assert!((second.payout - 1470.0).abs() < EPS);
        assert!((second.roi - 345.4545).abs() < 1e-3);
    }

    #[test]
    fn test_empty_investments() {
        let results = calculate_backing_results(1000.0, 0.1, 5000.0, &[]);
        assert_eq!(results.total_percentage_sold, 0.0);
        assert_eq!(results.total_invested, 0.0);
        assert_eq!(results.player_percentage, 100.0);
        assert!((results.player_profit - results.net_prize).abs() < EPS);
        assert!(results.payouts.is_empty());
    }

    #[test]
    fn test_zero_prize() {
        let results = calculate_backing_results(1000.0, 0.1, 0.0, &scenario());
        assert_eq!(results.net_prize, 0.0);
        assert_eq!(results.player_profit, 0.0);
        for payout in &results.payouts {
            assert_eq!(payout.payout, 0.0);
            assert!((payout.roi + 100.0).abs() < EPS);
        }
    }

    #[test]
    fn test_markup_exceeds_prize() {
        // Markup cost 100 against a 40 prize floors at zero.
        let results = calculate_backing_results(1000.0, 0.1, 40.0, &scenario());
        assert_eq!(results.net_prize, 0.0);
        assert!(results.payouts.iter().all(|p| p.payout == 0.0));
    }

    #[test]
    fn test_zero_amount_paid_has_zero_roi() {
        let investments = vec![Investment::new("free", "comp", 10.0, 0.0)];
        let results = calculate_backing_results(1000.0, 0.0, 5000.0, &investments);
        assert!((results.payouts[0].payout - 500.0).abs() < EPS);
        assert_eq!(results.payouts[0].roi, 0.0);
    }

    #[test]
    fn test_oversold_passes_through() {
        // Unclamped on purpose: the player's negative share is reported as-is.
        let investments = vec![
            Investment::new("1", "alice", 70.0, 700.0),
            Investment::new("2", "bob", 50.0, 500.0),
        ];
        let results = calculate_backing_results(1000.0, 0.1, 5000.0, &investments);
        assert!((results.total_percentage_sold - 120.0).abs() < EPS);
        assert!((results.player_percentage + 20.0).abs() < EPS);
        assert!((results.player_profit + 980.0).abs() < EPS);
        assert!(results.player_profit < 0.0);

        assert_eq!(
            assert_not_oversold(&results),
            Err(SettlementError::Oversold {
                player_percentage: results.player_percentage,
            })
        );
    }

    #[test]
    fn test_assert_not_oversold_accepts_full_sale() {
        let investments = vec![Investment::new("1", "alice", 100.0, 1100.0)];
        let results = calculate_backing_results(1000.0, 0.1, 5000.0, &investments);
        assert_eq!(results.player_percentage, 0.0);
        assert_eq!(assert_not_oversold(&results), Ok(()));
    }

    #[test]
    fn test_fractional_full_sale_not_oversold() {
        // Sums to 100.00000000000001 in f64.
        let investments = vec![
            Investment::new("1", "alice", 53.7, 537.0),
            Investment::new("2", "bob", 38.6, 386.0),
            Investment::new("3", "carol", 7.7, 77.0),
        ];
        let terms = OfferTerms::new(1000.0, 0.0);
        let results = calculate_for_offer(&terms, 2000.0, &investments);
        assert!(results.player_percentage.abs() < EPS);
        assert!(!results.is_oversold());
        assert_eq!(assert_not_oversold(&results), Ok(()));
        assert!(calculate_checked(&terms, 2000.0, &investments).is_ok());

        let oversold = vec![
            Investment::new("1", "alice", 53.7, 537.0),
            Investment::new("2", "bob", 38.6, 386.0),
            Investment::new("3", "carol", 7.8, 78.0),
        ];
        let results = calculate_for_offer(&terms, 2000.0, &oversold);
        assert!(matches!(
            assert_not_oversold(&results),
            Err(SettlementError::Oversold { .. })
        ));
    }

    #[test]
    fn test_order_preserved() {
        let investments = vec![
            Investment::new("z", "zed", 5.0, 50.0),
            Investment::new("a", "amy", 15.0, 150.0),
            Investment::new("m", "max", 10.0, 100.0),
        ];
        let results = calculate_backing_results(100.0, 0.0, 1000.0, &investments);
        let ids: Vec<_> = results.payouts.iter().map(|p| p.backer_id.as_str()).collect();
        assert_eq!(ids, ["z", "a", "m"]);
    }

    #[test]
    fn test_calculate_for_offer_matches() {
        let terms = OfferTerms::new(1000.0, 0.1);
        assert_eq!(
            calculate_for_offer(&terms, 5000.0, &scenario()),
            calculate_backing_results(1000.0, 0.1, 5000.0, &scenario())
        );
    }

    #[test]
    fn test_calculate_checked() {
        let terms = OfferTerms::new(1000.0, 0.1);
        let results = calculate_checked(&terms, 5000.0, &scenario()).expect("valid");
        assert!((results.net_prize - 4900.0).abs() < EPS);

        let oversold = vec![
            Investment::new("1", "alice", 70.0, 700.0),
            Investment::new("2", "bob", 50.0, 500.0),
        ];
        assert!(matches!(
            calculate_checked(&terms, 5000.0, &oversold),
            Err(SettlementError::Invalid(OfferInvariantError::Oversold { .. }))
        ));
        assert!(matches!(
            calculate_checked(&OfferTerms::new(1000.0, 2.0), 5000.0, &scenario()),
            Err(SettlementError::Invalid(
                OfferInvariantError::MarkupOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn test_calculate_investment_amount() {
        // The markup argument is a cost multiplier.
        assert!((calculate_investment_amount(1000.0, 20.0, 1.1) - 220.0).abs() < EPS);
        assert!((calculate_investment_amount(1000.0, 20.0, 1.0) - 200.0).abs() < EPS);
        // Passing a rate yields only the markup portion.
        assert!((calculate_investment_amount(1000.0, 20.0, 0.1) - 20.0).abs() < EPS);
        assert_eq!(calculate_investment_amount(1000.0, 0.0, 1.1), 0.0);
    }

    #[test]
    fn test_record_matches_preview() {
        let terms = OfferTerms::new(1000.0, 0.1);
        let preview = calculate_for_offer(&terms, 5000.0, &scenario());
        let records = record_settlement(&terms, 5000.0, &scenario());

        assert_eq!(records.len(), preview.payouts.len());
        for (record, payout) in records.iter().zip(&preview.payouts) {
            assert_eq!(record.investment_id, payout.backer_id);
            assert_eq!(record.backer_name, payout.backer_name);
            assert_eq!(record.payout, payout.payout);
            assert_eq!(record.roi, payout.roi);
        }
    }

    #[test]
    fn test_record_zero_paid_guard() {
        let investments = vec![Investment::new("free", "comp", 10.0, 0.0)];
        let records = record_settlement(&OfferTerms::new(100.0, 0.1), 0.0, &investments);
        assert_eq!(records[0].payout, 0.0);
        assert_eq!(records[0].roi, 0.0);
    }

    fn arb_investments() -> impl Strategy<Value = Vec<Investment>> {
        prop::collection::vec((0.0f64..=100.0, 0.0f64..1e6), 0..8).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (percentage, paid))| {
                    Investment::new(i.to_string(), format!("backer-{i}"), percentage, paid)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_net_prize_non_negative(
            buy_in in 0.0f64..1e7,
            markup in 0.0f64..2.0,
            prize in 0.0f64..1e8,
            investments in arb_investments(),
        ) {
            let results = calculate_backing_results(buy_in, markup, prize, &investments);
            prop_assert!(results.net_prize >= 0.0);
        }

        #[test]
        fn prop_shares_sum_to_net_prize(
            buy_in in 0.0f64..1e7,
            markup in 0.0f64..1.0,
            prize in 0.0f64..1e8,
            investments in arb_investments(),
        ) {
            let results = calculate_backing_results(buy_in, markup, prize, &investments);
            prop_assert!((results.total_percentage_sold + results.player_percentage - 100.0).abs() < 1e-9);
            let distributed = results.player_profit + results.total_payout();
            prop_assert!(
                approx(distributed, results.net_prize),
                "distributed {} != net {}", distributed, results.net_prize
            );
        }

        #[test]
        fn prop_deterministic(
            prize in 0.0f64..1e8,
            investments in arb_investments(),
        ) {
            let a = calculate_backing_results(1000.0, 0.1, prize, &investments);
            let b = calculate_backing_results(1000.0, 0.1, prize, &investments);
            prop_assert_eq!(a, b);
        }
    }
}
