//! Settlement files: offers plus the raw investment rows exported from the backend.

use serde::Deserialize;
use stakebook_execution::{calculate_checked, OfferSettlement, SettlementError};
use stakebook_types::{investments_from_rows, InvestmentRow, OfferTerms, RowError};
use std::{fs, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path} as JSON: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {path} as YAML: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("offer {offer_id}: {source}")]
    Row {
        offer_id: String,
        #[source]
        source: RowError,
    },
    #[error("offer {offer_id}: {source}")]
    Settlement {
        offer_id: String,
        #[source]
        source: SettlementError,
    },
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferInput {
    #[serde(alias = "offer_id")]
    pub offer_id: String,
    pub terms: OfferTerms,
    #[serde(alias = "prize_amount")]
    pub prize_amount: f64,
    #[serde(default)]
    pub investments: Vec<InvestmentRow>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SettlementFile {
    pub offers: Vec<OfferInput>,
}

impl SettlementFile {
    /// Reads a `.json` file as JSON and anything else as YAML.
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let display = path.display().to_string();
        let raw = fs::read_to_string(path).map_err(|source| InputError::Read {
            path: display.clone(),
            source,
        })?;
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&raw).map_err(|source| InputError::Json {
                path: display,
                source,
            })
        } else {
            serde_yaml::from_str(&raw).map_err(|source| InputError::Yaml {
                path: display,
                source,
            })
        }
    }

    /// Flattens backend rows into typed settlements.
    pub fn into_settlements(self) -> Result<Vec<OfferSettlement>, InputError> {
        self.offers
            .into_iter()
            .map(|offer| {
                let investments =
                    investments_from_rows(offer.investments).map_err(|source| InputError::Row {
                        offer_id: offer.offer_id.clone(),
                        source,
                    })?;
                Ok(OfferSettlement {
                    offer_id: offer.offer_id,
                    terms: offer.terms,
                    prize_amount: offer.prize_amount,
                    investments,
                })
            })
            .collect()
    }
}

/// Runs boundary validation over every offer, stopping at the first failure.
pub fn validate_offers(offers: &[OfferSettlement]) -> Result<(), InputError> {
    for offer in offers {
        calculate_checked(&offer.terms, offer.prize_amount, &offer.investments).map_err(
            |source| InputError::Settlement {
                offer_id: offer.offer_id.clone(),
                source,
            },
        )?;
    }
    Ok(())
}
