use serde::Deserialize;
use tracing::{debug, instrument};

use pathable_base::{FilePath, PalHandle, PathableResult, ResultExt, construction_err};

use crate::parser::SEPARATOR;

/// Configuration shared by the paths and accessors built from it.
///
/// ```
/// use pathable::PathableConfig;
///
/// let config = PathableConfig::from_toml_str(
///     r#"
///     separator = "."
///
///     [cache]
///     max_entries = 16
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.separator, '.');
/// assert_eq!(config.cache.limit(), Some(16));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathableConfig {
    /// Character that splits text arguments into segments.
    pub separator: char,
    /// Result cache settings for accessors.
    pub cache: CacheConfig,
}

impl Default for PathableConfig {
    fn default() -> Self {
        Self {
            separator: SEPARATOR,
            cache: CacheConfig::default(),
        }
    }
}

impl PathableConfig {
    /// Parse a TOML document. Missing fields take their defaults.
    pub fn from_toml_str(text: &str) -> PathableResult<Self> {
        toml::from_str(text).map_err(|e| construction_err!("invalid configuration: {}", e))
    }
}

/// Result cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Whether reads are memoized at all.
    pub enabled: bool,
    /// Entry bound; zero turns the cache into a pass-through.
    pub max_entries: usize,
    /// Ignore `max_entries` and never evict.
    pub unbounded: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 128,
            unbounded: false,
        }
    }
}

impl CacheConfig {
    /// Entry bound, `None` when unbounded.
    pub fn limit(&self) -> Option<usize> {
        if self.unbounded {
            None
        } else {
            Some(self.max_entries)
        }
    }
}

/// Read and parse a TOML configuration file through the PAL.
#[instrument(skip(pal), fields(path = %path))]
pub fn load_config(pal: &PalHandle, path: &FilePath) -> PathableResult<PathableConfig> {
    let bytes = pal.read_file(path)?;
    let text = String::from_utf8(bytes)
        .map_err(|e| construction_err!("configuration is not valid UTF-8: {}", e))
        .with_context(|| format!("loading {}", path))?;
    let config = PathableConfig::from_toml_str(&text).with_context(|| format!("loading {}", path))?;
    debug!(separator = %config.separator, cache = ?config.cache, "configuration loaded");
    Ok(config)
}
