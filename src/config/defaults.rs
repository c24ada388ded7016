//! Default configuration values
//!
//! Named constants for all tunable parameters

/// Default number of search results requested
pub const DEFAULT_SEARCH_LIMIT: usize = 8;

/// Place-granularity categories searched by default
pub const DEFAULT_SEARCH_TYPES: &str =
    "country,region,postcode,district,place,locality,neighborhood";

/// Default network timeout for search and assistant requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Minimum query length before a search is submitted
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// Default search trigger ("submit" or "keystroke")
pub const DEFAULT_SEARCH_TRIGGER: &str = "submit";

/// Default OpenAI model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default sampling temperature for the assistant
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Initial globe center (lng, lat)
pub const DEFAULT_CENTER: [f64; 2] = [0.0, 0.0];

/// Initial globe zoom
pub const DEFAULT_ZOOM: f64 = 1.5;

/// Default theme
pub const DEFAULT_THEME: &str = "light";

/// Zoom used when flying to a result that has a bounding box
pub const DEFAULT_REGION_ZOOM: f64 = 15.0;

/// Zoom used when flying to a bare point
pub const DEFAULT_POINT_ZOOM: f64 = 14.0;

/// Inset padding when fitting the camera to a bounding box
pub const DEFAULT_FIT_PADDING: f64 = 50.0;

/// Full globe revolution time while zoomed out
pub const DEFAULT_SECONDS_PER_REVOLUTION: f64 = 120.0;

/// Rotation stops at or above this zoom
pub const DEFAULT_MAX_SPIN_ZOOM: f64 = 4.0;

/// Rotation slows down between this zoom and the max spin zoom
pub const DEFAULT_SLOW_SPIN_ZOOM: f64 = 3.0;

/// Duration of one rotation step
pub const DEFAULT_SPIN_STEP_MS: u64 = 1000;

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port
pub const DEFAULT_PORT: u16 = 7878;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name (for XDG paths)
pub const APP_DIR_NAME: &str = "pinpoint";
