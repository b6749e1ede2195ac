//! Common types used throughout stakebook.

pub mod backing;
pub mod row;

pub use backing::*;
pub use row::{investments_from_rows, BackerRef, InvestmentRow, RowError, RowValue};
