//! Constants shared across plotmark modules.

/// Default prefix for cache file names.
pub const DEFAULT_FILE_PREFIX: &str = "plotmark";

/// Infix between the prefix and the fingerprint in cache file names.
pub const CACHE_FILE_INFIX: &str = "graph";

/// Extension of cached images; the renderer produces PNG rasters.
pub const IMAGE_EXTENSION: &str = "png";

/// Origin the renderer's completion messages carry unless configured otherwise.
pub const DEFAULT_RENDERER_ORIGIN: &str = "app://plotmark";

/// Environment variable overriding the config file location.
pub const CONFIG_ENV_VAR: &str = "PLOTMARK_CONFIG";
