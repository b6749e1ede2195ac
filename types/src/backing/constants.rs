/// The whole of a player's action, in percent.
pub const FULL_ACTION_PERCENT: f64 = 100.0;

/// Highest markup rate accepted by boundary validation (100% surcharge).
pub const MAX_MARKUP_RATE: f64 = 1.0;

/// Maximum length of a backer display name.
pub const MAX_BACKER_NAME_LENGTH: usize = 64;

/// Slack allowed when comparing summed percentages against the full action.
pub const OVERSOLD_EPSILON: f64 = 1e-9;
