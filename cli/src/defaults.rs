pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_LOG_JSON: bool = false;
pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_STRICT: bool = false;
