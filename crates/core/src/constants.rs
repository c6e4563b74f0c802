/// Plan variant used when a caller does not specify one.
pub const DEFAULT_PLAN_VARIANT: &str = "default";

/// Earliest plan year accepted by the legacy year+cutoff period form.
pub const MIN_PLAN_YEAR: i32 = 2000;

/// Time-to-live for the listing read-through cache.
pub const LISTING_CACHE_TTL_SECS: u64 = 30;

/// Tolerance used when comparing accumulated currency amounts.
pub const CURRENCY_EPSILON: f64 = 1e-6;
