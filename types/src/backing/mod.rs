//! Staking domain types.
//!
//! Defines offer terms, investments, and settlement outputs consumed and produced by the
//! execution layer, together with the boundary checks callers run before settling.

mod constants;
mod offer;
mod results;

pub use constants::*;
pub use offer::*;
pub use results::*;
