//! Adapts joined investment rows returned by the backend into [`Investment`] values.
//!
//! Rows arrive with snake_case or camelCase keys, numbers that may be encoded as strings,
//! and the backer name either flat or nested under a joined `backer`/`backers` object.

use serde::Deserialize;
use thiserror::Error;

use crate::backing::Investment;

#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("investment {id} has no backer name")]
    MissingBackerName { id: String },
    #[error("investment {id}: {field} is not a number: {value}")]
    InvalidNumber {
        id: String,
        field: &'static str,
        value: String,
    },
}

/// A scalar column that may be serialized as a JSON number or a string.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RowValue {
    Number(f64),
    Text(String),
}

impl RowValue {
    fn to_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    fn to_id(&self) -> String {
        match self {
            Self::Number(value) if value.fract() == 0.0 && value.is_finite() => {
                format!("{}", *value as i64)
            }
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

/// Joined backer columns.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct BackerRef {
    #[serde(default)]
    pub name: Option<String>,
}

/// Investment row as returned by the backend join.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentRow {
    pub id: RowValue,
    #[serde(default, alias = "backer_name")]
    pub backer_name: Option<String>,
    #[serde(default, alias = "backers")]
    pub backer: Option<BackerRef>,
    #[serde(alias = "percentage_bought")]
    pub percentage_bought: RowValue,
    #[serde(alias = "amount_paid")]
    pub amount_paid: RowValue,
}

impl InvestmentRow {
    fn number(&self, id: &str, field: &'static str, value: &RowValue) -> Result<f64, RowError> {
        value.to_number().ok_or_else(|| RowError::InvalidNumber {
            id: id.to_string(),
            field,
            value: value.describe(),
        })
    }
}

impl TryFrom<InvestmentRow> for Investment {
    type Error = RowError;

    fn try_from(row: InvestmentRow) -> Result<Self, Self::Error> {
        let id = row.id.to_id();
        let percentage_bought = row.number(&id, "percentage_bought", &row.percentage_bought)?;
        let amount_paid = row.number(&id, "amount_paid", &row.amount_paid)?;

        // Flat column wins over the joined object.
        let backer_name = row
            .backer_name
            .filter(|name| !name.trim().is_empty())
            .or_else(|| row.backer.and_then(|backer| backer.name))
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| RowError::MissingBackerName { id: id.clone() })?;

        Ok(Investment {
            id,
            backer_name,
            percentage_bought,
            amount_paid,
        })
    }
}

/// Converts a batch of rows, failing on the first malformed row.
pub fn investments_from_rows(
    rows: impl IntoIterator<Item = InvestmentRow>,
) -> Result<Vec<Investment>, RowError> {
    rows.into_iter().map(Investment::try_from).collect()
}
