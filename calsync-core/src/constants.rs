/// Upper bound on events fetched per calendar query.
pub const DEFAULT_MAX_RESULTS: usize = 1000;

/// Attempts per remote call when retries are enabled (first try included).
pub const DEFAULT_RETRY_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled on each further attempt.
pub const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 500;
