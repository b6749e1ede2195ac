use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

use super::{FULL_ACTION_PERCENT, MAX_BACKER_NAME_LENGTH, MAX_MARKUP_RATE, OVERSOLD_EPSILON};

#[derive(Debug, ThisError, PartialEq)]
pub enum InvestmentInvariantError {
    #[error("backer name is empty")]
    EmptyBackerName,
    #[error("backer name too long (len={len}, max={max})")]
    BackerNameTooLong { len: usize, max: usize },
    #[error("percentage_bought out of range (got={got}, max={max})")]
    PercentageOutOfRange { got: f64, max: f64 },
    #[error("amount_paid must be a non-negative amount (got={got})")]
    InvalidAmountPaid { got: f64 },
}

#[derive(Debug, ThisError, PartialEq)]
pub enum OfferInvariantError {
    #[error("buy_in_amount must be a non-negative amount (got={got})")]
    InvalidBuyIn { got: f64 },
    #[error("markup_percentage out of range (got={got}, max={max})")]
    MarkupOutOfRange { got: f64, max: f64 },
    #[error("prize_amount must be a non-negative amount (got={got})")]
    InvalidPrize { got: f64 },
    #[error("investment {id} is invalid: {source}")]
    Investment {
        id: String,
        #[source]
        source: InvestmentInvariantError,
    },
    #[error("offer oversold (sold={sold}%, max={max}%)")]
    Oversold { sold: f64, max: f64 },
}

fn is_amount(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Terms a player sells action under.
///
/// `markup_percentage` is a fraction (`0.10` for 10%), not a whole percentage.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferTerms {
    pub buy_in_amount: f64,
    pub markup_percentage: f64,
}

impl OfferTerms {
    pub fn new(buy_in_amount: f64, markup_percentage: f64) -> Self {
        Self {
            buy_in_amount,
            markup_percentage,
        }
    }

    /// Cost deducted from the gross prize before it is shared out.
    pub fn markup_cost(&self) -> f64 {
        self.buy_in_amount * self.markup_percentage
    }

    pub fn validate_invariants(&self) -> Result<(), OfferInvariantError> {
        if !is_amount(self.buy_in_amount) {
            return Err(OfferInvariantError::InvalidBuyIn {
                got: self.buy_in_amount,
            });
        }
        if !(0.0..=MAX_MARKUP_RATE).contains(&self.markup_percentage) {
            return Err(OfferInvariantError::MarkupOutOfRange {
                got: self.markup_percentage,
                max: MAX_MARKUP_RATE,
            });
        }
        Ok(())
    }
}

/// A single staker's purchase of a player's action.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Investment {
    pub id: String,
    pub backer_name: String,
    /// Share of the action bought, 0-100.
    pub percentage_bought: f64,
    pub amount_paid: f64,
}

impl Investment {
    pub fn new(
        id: impl Into<String>,
        backer_name: impl Into<String>,
        percentage_bought: f64,
        amount_paid: f64,
    ) -> Self {
        Self {
            id: id.into(),
            backer_name: backer_name.into(),
            percentage_bought,
            amount_paid,
        }
    }

    pub fn validate_invariants(&self) -> Result<(), InvestmentInvariantError> {
        let name = self.backer_name.trim();
        if name.is_empty() {
            return Err(InvestmentInvariantError::EmptyBackerName);
        }
        if name.len() > MAX_BACKER_NAME_LENGTH {
            return Err(InvestmentInvariantError::BackerNameTooLong {
                len: name.len(),
                max: MAX_BACKER_NAME_LENGTH,
            });
        }
        if !(0.0..=FULL_ACTION_PERCENT).contains(&self.percentage_bought) {
            return Err(InvestmentInvariantError::PercentageOutOfRange {
                got: self.percentage_bought,
                max: FULL_ACTION_PERCENT,
            });
        }
        if !is_amount(self.amount_paid) {
            return Err(InvestmentInvariantError::InvalidAmountPaid {
                got: self.amount_paid,
            });
        }
        Ok(())
    }
}

/// Checks everything the settlement math assumes but never enforces itself.
///
/// Runs at the boundary (form submission, import, `--strict` CLI runs). The calculation
/// accepts inputs this rejects and passes them through unchanged.
pub fn validate_settlement(
    terms: &OfferTerms,
    prize_amount: f64,
    investments: &[Investment],
) -> Result<(), OfferInvariantError> {
    terms.validate_invariants()?;
    if !is_amount(prize_amount) {
        return Err(OfferInvariantError::InvalidPrize { got: prize_amount });
    }
    for investment in investments {
        investment
            .validate_invariants()
            .map_err(|source| OfferInvariantError::Investment {
                id: investment.id.clone(),
                source,
            })?;
    }
    let sold: f64 = investments.iter().map(|i| i.percentage_bought).sum();
    if sold - FULL_ACTION_PERCENT > OVERSOLD_EPSILON {
        return Err(OfferInvariantError::Oversold {
            sold,
            max: FULL_ACTION_PERCENT,
        });
    }
    Ok(())
}
