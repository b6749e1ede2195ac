//! Stakebook settlement layer.
//!
//! This crate contains the staking settlement math used by dashboard previews and by the
//! settlement recorder, plus the reporting and display helpers built on it.
//!
//! ## Determinism requirements
//! - Functions are pure: no I/O, no clocks, no shared mutable state.
//! - Output order follows input order; aggregates iterate in sorted key order.
//! - Validation is opt-in ([`calculate_checked`], [`assert_not_oversold`]); the core math is
//!   total and never rejects input.
//!
//! ## Example
//! ```rust
//! use stakebook_execution::calculate_backing_results;
//! use stakebook_types::Investment;
//!
//! let investments = vec![
//!     Investment::new("inv-1", "alice", 20.0, 220.0),
//!     Investment::new("inv-2", "bob", 30.0, 330.0),
//! ];
//! let results = calculate_backing_results(1000.0, 0.1, 5000.0, &investments);
//! assert!((results.net_prize - 4900.0).abs() < 1e-9);
//! assert!((results.player_profit - 2450.0).abs() < 1e-9);
//! ```

pub mod batch;
pub mod format;
pub mod ledger;
pub mod settlement;

pub use batch::{preview_batch, record_batch, OfferPreview, OfferRecords, OfferSettlement};
pub use format::{format_currency, format_percentage, format_roi, CurrencyFormat};
pub use ledger::{BackerLedger, BackerSummary};
pub use settlement::{
    assert_not_oversold, calculate_backing_results, calculate_checked, calculate_for_offer,
    calculate_investment_amount, net_prize, payout_share, record_settlement, roi_percent,
    SettlementError,
};
