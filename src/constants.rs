//! Crate-wide defaults shared by the CLI and the collaborators.

/// Default games endpoint of the stats API.
pub const DEFAULT_API_BASE_URL: &str = "https://api.balldontlie.io/v1/games";

/// Environment variable holding the stats API key.
pub const API_KEY_ENV: &str = "BALLDONTLIE_API_KEY";

/// Records requested per page during ingestion.
pub const DEFAULT_PER_PAGE: u32 = 100;

/// Upper bound on pages fetched per season, in case the API keeps
/// returning a cursor.
pub const DEFAULT_MAX_PAGES: u32 = 60;

/// Pause applied by the orchestration layer when the API signals a rate
/// limit, in seconds.
pub const DEFAULT_RATE_LIMIT_PAUSE_SECS: u64 = 12;

/// Root of the on-disk data layout (raw, clean, errors, reports, indicators).
pub const DEFAULT_DATA_DIR: &str = "data";

pub const RAW_SUBDIR: &str = "raw";
pub const CLEAN_SUBDIR: &str = "clean";
pub const ERRORS_SUBDIR: &str = "errors";
pub const REPORTS_SUBDIR: &str = "reports";
pub const INDICATORS_SUBDIR: &str = "indicators";
